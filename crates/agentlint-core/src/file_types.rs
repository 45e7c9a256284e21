//! File kind detection. Rules use the kind to no-op on files they do not
//! understand.

use std::path::Path;

/// Detected file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// SKILL.md or *.skill.md
    Skill,
    /// agents/*.md or .claude/agents/*.md
    Agent,
    /// CLAUDE.md, AGENTS.md and their .local variants
    Instructions,
    /// settings.json, settings.local.json, hooks.json
    Hooks,
    /// plugin.json
    Plugin,
    /// Any other markdown file
    Markdown,
    /// Any other JSON file
    Json,
    Unknown,
}

impl FileKind {
    /// Markdown-based kinds (front matter + text).
    pub fn is_markdown(&self) -> bool {
        matches!(
            self,
            FileKind::Skill | FileKind::Agent | FileKind::Instructions | FileKind::Markdown
        )
    }

    /// JSON manifest kinds.
    pub fn is_json(&self) -> bool {
        matches!(self, FileKind::Hooks | FileKind::Plugin | FileKind::Json)
    }
}

/// Detect file kind based on path patterns
pub fn detect_file_kind(path: &Path) -> FileKind {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());

    match filename {
        "SKILL.md" => FileKind::Skill,
        "CLAUDE.md" | "AGENTS.md" | "CLAUDE.local.md" | "AGENTS.local.md" => {
            FileKind::Instructions
        }
        "settings.json" | "settings.local.json" | "hooks.json" => FileKind::Hooks,
        "plugin.json" => FileKind::Plugin,
        name if name.ends_with(".skill.md") => FileKind::Skill,
        name if name.ends_with(".md") => {
            if parent == Some("agents") {
                FileKind::Agent
            } else {
                FileKind::Markdown
            }
        }
        name if name.ends_with(".json") => FileKind::Json,
        _ => FileKind::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_skill() {
        assert_eq!(detect_file_kind(Path::new("SKILL.md")), FileKind::Skill);
        assert_eq!(
            detect_file_kind(Path::new(".claude/skills/deploy/SKILL.md")),
            FileKind::Skill
        );
        assert_eq!(detect_file_kind(Path::new("a/b.skill.md")), FileKind::Skill);
    }

    #[test]
    fn test_detect_instructions() {
        assert_eq!(
            detect_file_kind(Path::new("CLAUDE.md")),
            FileKind::Instructions
        );
        assert_eq!(
            detect_file_kind(Path::new("pkg/AGENTS.local.md")),
            FileKind::Instructions
        );
    }

    #[test]
    fn test_detect_agents() {
        assert_eq!(
            detect_file_kind(Path::new(".claude/agents/helper.md")),
            FileKind::Agent
        );
        assert_eq!(detect_file_kind(Path::new("docs/guide.md")), FileKind::Markdown);
    }

    #[test]
    fn test_detect_json_kinds() {
        assert_eq!(
            detect_file_kind(Path::new(".claude/settings.json")),
            FileKind::Hooks
        );
        assert_eq!(
            detect_file_kind(Path::new(".claude-plugin/plugin.json")),
            FileKind::Plugin
        );
        assert_eq!(detect_file_kind(Path::new("package.json")), FileKind::Json);
        assert!(FileKind::Plugin.is_json());
        assert!(!FileKind::Plugin.is_markdown());
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_file_kind(Path::new("main.rs")), FileKind::Unknown);
    }
}
