use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn agentlint(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("agentlint");
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("AGENTLINT_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "skills/review/SKILL.md",
        "---\nname: review\ndescription: Reviews pull requests\n---\n\nBody\n",
    );
    write(dir.path(), "CLAUDE.md", "# Project\n\nUse the review skill.\n");
    dir
}

#[test]
fn test_clean_project_exits_zero() {
    let dir = project();
    agentlint(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) checked: 0 error(s), 0 warning(s)"));
}

#[test]
fn test_errors_exit_one() {
    let dir = project();
    write(dir.path(), "skills/bad/SKILL.md", "---\nname: Bad Name\ndescription: x\n---\n");
    agentlint(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SK-001"))
        .stdout(predicate::str::contains("not kebab-case"));
}

#[test]
fn test_config_can_turn_rule_off() {
    let dir = project();
    write(dir.path(), "skills/bad/SKILL.md", "---\nname: Bad Name\ndescription: x\n---\n");
    write(dir.path(), ".agentlint.json", r#"{"rules": {"SK-001": "off"}}"#);
    agentlint(dir.path()).assert().success();
}

#[test]
fn test_yaml_config_with_overrides() {
    let dir = project();
    write(dir.path(), "skills/bad/SKILL.md", "---\nname: Bad Name\ndescription: x\n---\n");
    write(
        dir.path(),
        ".agentlint.yaml",
        "overrides:\n  - files: ['skills/bad/**']\n    rules:\n      SK-001: warn\n",
    );
    agentlint(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("warning"));
}

#[test]
fn test_unknown_rule_is_fatal() {
    let dir = project();
    write(dir.path(), ".agentlint.json", r#"{"rules": {"NOPE-1": "error"}}"#);
    agentlint(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule 'NOPE-1'"));
}

#[test]
fn test_circular_extends_is_fatal() {
    let dir = project();
    write(dir.path(), "a.json", r#"{"extends": "./b.json"}"#);
    write(dir.path(), "b.json", r#"{"extends": "./a.json"}"#);
    agentlint(dir.path())
        .args(["--config", "a.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Circular extends"));
}

#[test]
fn test_missing_path_is_fatal() {
    let dir = project();
    agentlint(dir.path())
        .arg("does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path not found"));
}

#[test]
fn test_json_output() {
    let dir = project();
    write(dir.path(), "notes.md", "trailing  \n");
    let output = agentlint(dir.path())
        .args(["--format", "json", "notes.md"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], true);
    assert_eq!(report["summary"]["warnings"], 1);
    assert_eq!(report["files"][0]["warnings"][0]["ruleId"], "MD-001");
}

#[test]
fn test_fix_writes_file() {
    let dir = project();
    let notes = write(dir.path(), "notes.md", "one  \ntwo\t\n");
    agentlint(dir.path())
        .args(["--fix", "notes.md"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Fixed 1 file(s)"));
    assert_eq!(fs::read_to_string(notes).unwrap(), "one\ntwo\n");
}

#[test]
fn test_max_warnings() {
    let dir = project();
    write(dir.path(), "notes.md", "a \nb \n");
    agentlint(dir.path())
        .args(["--max-warnings", "1", "notes.md"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Too many warnings"));
    agentlint(dir.path())
        .args(["--max-warnings", "2", "notes.md"])
        .assert()
        .success();
}

#[test]
fn test_quiet_hides_warnings() {
    let dir = project();
    write(dir.path(), "notes.md", "a \n");
    agentlint(dir.path())
        .args(["--quiet", "notes.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MD-001").not());
}

#[test]
fn test_unused_directive_flag() {
    let dir = project();
    write(dir.path(), "notes.md", "<!-- lint-disable-next-line MD-001 -->\nclean\n");
    agentlint(dir.path())
        .args(["--report-unused-disable-directives", "notes.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused 'lint-disable-next-line MD-001' directive"));
}

#[test]
fn test_ignore_patterns_skip_files() {
    let dir = project();
    write(dir.path(), "vendor/skills/x/SKILL.md", "---\nname: Bad Name\n---\n");
    write(dir.path(), ".agentlint.json", r#"{"ignorePatterns": ["vendor/**"]}"#);
    agentlint(dir.path()).assert().success();
}

#[test]
fn test_invalid_options_reported_as_fatal() {
    let dir = project();
    write(
        dir.path(),
        ".agentlint.json",
        r#"{"rules": {"SK-001": {"severity": "error", "options": {"maxLength": "long"}}}}"#,
    );
    agentlint(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid options for rule 'SK-001'"));
}

#[test]
fn test_deprecated_rule_note() {
    let dir = project();
    write(dir.path(), ".agentlint.json", r#"{"rules": {"SK-003": "warn"}}"#);
    agentlint(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("note: Rule 'SK-003' is deprecated"));
}

#[test]
fn test_print_config_schema() {
    let dir = TempDir::new().unwrap();
    let output = agentlint(dir.path())
        .arg("--print-config-schema")
        .output()
        .unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"].get("ignorePatterns").is_some());
}
