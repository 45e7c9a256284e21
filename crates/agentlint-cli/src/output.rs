//! Result reporting and fix write-back

use agentlint_core::{FileResult, Issue, LintSummary, Severity};
use anyhow::Context;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    version: &'static str,
    files: &'a [FileResult],
    summary: &'a LintSummary,
    passed: bool,
}

pub fn print_json(results: &[FileResult], summary: &LintSummary) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        files: results,
        summary,
        passed: summary.passed(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn print_text(results: &[FileResult], summary: &LintSummary, quiet: bool) {
    for result in results {
        let issues: Vec<&Issue> = result
            .issues()
            .filter(|issue| !quiet || issue.is_error())
            .collect();
        if issues.is_empty() {
            continue;
        }

        println!("\n{}", result.file_path.display().to_string().bold());
        for issue in issues {
            print_issue(issue);
        }
    }

    println!();
    let totals = format!(
        "{} file(s) checked: {} error(s), {} warning(s)",
        summary.files, summary.errors, summary.warnings
    );
    if summary.errors > 0 {
        println!("{}", totals.red().bold());
    } else if summary.warnings > 0 {
        println!("{}", totals.yellow());
    } else {
        println!("{}", totals.green());
    }
    if summary.fixable > 0 {
        println!("{} issue(s) fixable with --fix", summary.fixable);
    }
    if summary.too_many_warnings()
        && let Some(max) = summary.max_warnings
    {
        println!(
            "{}",
            format!("Too many warnings ({}), maximum allowed is {}", summary.warnings, max).red()
        );
    }
}

fn print_issue(issue: &Issue) {
    let severity = match issue.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warn => "warning".yellow().bold(),
        Severity::Off => "off".normal(),
    };
    let line = issue
        .line
        .map(|line| format!("{:>4}", line))
        .unwrap_or_else(|| "   -".to_string());
    let rule = issue
        .rule_id
        .as_deref()
        .map(|id| format!("  {}", id.dimmed()))
        .unwrap_or_default();
    println!("  {}  {}  {}{}", line.dimmed(), severity, issue.message, rule);
    if let Some(hint) = &issue.fix_hint {
        println!("        {} {}", "hint:".cyan(), hint);
    }
}

/// Write every changed file back to disk. Returns how many were written.
pub fn write_fixes(results: &[FileResult]) -> anyhow::Result<usize> {
    let mut written = 0;
    for result in results {
        let Some(fixed) = &result.fixed_output else {
            continue;
        };
        std::fs::write(&result.file_path, fixed)
            .with_context(|| format!("failed to write fixes to {}", result.file_path.display()))?;
        tracing::debug!(
            path = %result.file_path.display(),
            fixes = result.applied_fixes.len(),
            "wrote fixes"
        );
        written += 1;
    }
    Ok(written)
}
