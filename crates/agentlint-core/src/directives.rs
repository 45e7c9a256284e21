//! Inline suppression directives.
//!
//! Directives are comments in the file's own syntax:
//!
//! ```text
//! <!-- lint-disable-next-line SK-001 -->    markdown, anywhere
//! # lint-disable-file                       markdown, inside YAML front matter
//! // lint-disable MD-001                    files of unknown kind
//! ```
//!
//! JSON has no comments, so JSON files carry no directives. An omitted rule
//! id means every rule. Ranges are inclusive at both ends and a
//! `lint-disable` without a matching `lint-enable` runs to the last line.

use crate::diagnostics::{Issue, Severity};
use crate::file_types::FileKind;
use crate::parsers::split_frontmatter;
use crate::regex_util::static_regex;
use std::path::Path;

static_regex!(
    fn directive_regex,
    r"(<!--|//|#)\s*lint-(disable-file|disable-next-line|disable-line|disable|enable)(?:\s+([A-Za-z0-9_.:/@]+(?:-[A-Za-z0-9_.:/@]+)*))?(?:\s|-->|$)"
);

/// Comment openers a line may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommentSyntax {
    html: bool,
    slashes: bool,
    hash: bool,
}

impl CommentSyntax {
    const NONE: Self = Self {
        html: false,
        slashes: false,
        hash: false,
    };

    fn allows(&self, opener: &str) -> bool {
        match opener {
            "<!--" => self.html,
            "//" => self.slashes,
            "#" => self.hash,
            _ => false,
        }
    }
}

/// Comment syntax of each line of a file of `kind`.
///
/// Markdown takes HTML comments everywhere and `#` only between the front
/// matter fences; in the body `#` opens a heading.
fn line_syntax(kind: FileKind, content: &str) -> impl Fn(usize) -> CommentSyntax {
    let yaml_lines = if kind.is_markdown() {
        split_frontmatter(content)
            .and_then(|fm| fm.end_line.map(|end| (fm.start_line + 1, end)))
    } else {
        None
    };
    move |line| {
        if kind.is_json() {
            CommentSyntax::NONE
        } else if kind.is_markdown() {
            CommentSyntax {
                html: true,
                slashes: false,
                hash: yaml_lines.is_some_and(|(first, end)| first <= line && line < end),
            }
        } else {
            CommentSyntax {
                html: true,
                slashes: true,
                hash: true,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    DisableFile,
    DisableNextLine,
    DisableLine,
    Disable,
}

impl DirectiveKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DirectiveKind::DisableFile => "lint-disable-file",
            DirectiveKind::DisableNextLine => "lint-disable-next-line",
            DirectiveKind::DisableLine => "lint-disable-line",
            DirectiveKind::Disable => "lint-disable",
        }
    }
}

/// One parsed directive. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// `None` applies to every rule
    pub rule_id: Option<String>,
    /// Suppressed lines; `None` for file-scoped directives
    pub start_line: Option<usize>,
    pub end_line: Option<usize>,
    pub directive_line: usize,
    /// Set once the directive suppresses an issue
    pub used: bool,
}

impl Directive {
    fn new(kind: DirectiveKind, rule_id: Option<String>, directive_line: usize) -> Self {
        let (start_line, end_line) = match kind {
            DirectiveKind::DisableFile => (None, None),
            DirectiveKind::DisableNextLine => (Some(directive_line + 1), Some(directive_line + 1)),
            DirectiveKind::DisableLine => (Some(directive_line), Some(directive_line)),
            DirectiveKind::Disable => (Some(directive_line), None),
        };
        Self {
            kind,
            rule_id,
            start_line,
            end_line,
            directive_line,
            used: false,
        }
    }

    fn matches(&self, line: Option<usize>, rule_id: &str) -> bool {
        let rule_matches = self.rule_id.as_deref().is_none_or(|id| id == rule_id);
        if !rule_matches {
            return false;
        }
        if self.kind == DirectiveKind::DisableFile {
            return true;
        }
        match (line, self.start_line, self.end_line) {
            (Some(line), Some(start), Some(end)) => start <= line && line <= end,
            _ => false,
        }
    }

    /// Directive as written, e.g. `lint-disable-next-line SK-001`.
    pub fn label(&self) -> String {
        match &self.rule_id {
            Some(id) => format!("{} {}", self.kind.keyword(), id),
            None => self.kind.keyword().to_string(),
        }
    }
}

/// Suppression index of one file.
#[derive(Debug, Clone, Default)]
pub struct DirectiveIndex {
    directives: Vec<Directive>,
}

impl DirectiveIndex {
    /// Scan `content` of a file of `kind` for directives.
    pub fn parse(content: &str, kind: FileKind) -> Self {
        let syntax = line_syntax(kind, content);
        let mut directives: Vec<Directive> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut last_line = 0usize;

        for (idx, text) in content.lines().enumerate() {
            let line = idx + 1;
            last_line = line;
            let allowed = syntax(line);
            if allowed == CommentSyntax::NONE {
                continue;
            }
            let Some(caps) = directive_regex()
                .captures_iter(text)
                .find(|caps| caps.get(1).is_some_and(|m| allowed.allows(m.as_str())))
            else {
                continue;
            };
            let rule_id = caps.get(3).map(|m| m.as_str().to_string());
            let kind = match caps.get(2).map(|m| m.as_str()) {
                Some("disable-file") => DirectiveKind::DisableFile,
                Some("disable-next-line") => DirectiveKind::DisableNextLine,
                Some("disable-line") => DirectiveKind::DisableLine,
                Some("disable") => DirectiveKind::Disable,
                Some("enable") => {
                    // Closes the most recent open range with exactly this id
                    if let Some(pos) = open
                        .iter()
                        .rposition(|&slot| directives[slot].rule_id == rule_id)
                    {
                        let slot = open.remove(pos);
                        directives[slot].end_line = Some(line);
                    }
                    continue;
                }
                _ => continue,
            };
            if kind == DirectiveKind::Disable {
                open.push(directives.len());
            }
            directives.push(Directive::new(kind, rule_id, line));
        }

        for slot in open {
            directives[slot].end_line = Some(last_line.max(directives[slot].directive_line));
        }

        Self { directives }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Whether an issue of `rule_id` at `line` is suppressed. Marks the first
    /// matching directive as used. Issues without a rule are never
    /// suppressed; without a line only file-scoped directives apply.
    pub fn is_suppressed(&mut self, line: Option<usize>, rule_id: Option<&str>) -> bool {
        let Some(rule_id) = rule_id else {
            return false;
        };
        match self.directives.iter_mut().find(|d| d.matches(line, rule_id)) {
            Some(directive) => {
                directive.used = true;
                true
            }
            None => false,
        }
    }

    /// Directives that never suppressed anything.
    pub fn unused(&self) -> impl Iterator<Item = &Directive> {
        self.directives.iter().filter(|d| !d.used)
    }

    /// One warning per unused directive, placed on the directive's line.
    pub fn unused_issues(&self, path: &Path) -> Vec<Issue> {
        self.unused()
            .map(|directive| {
                let scope = match &directive.rule_id {
                    Some(id) => format!("no '{}' issues were reported", id),
                    None => "no issues were reported".to_string(),
                };
                Issue::unattributed(
                    Severity::Warn,
                    format!("Unused '{}' directive ({})", directive.label(), scope),
                )
                .in_file(path)
                .at_line(directive.directive_line)
                .with_fix_hint("Remove the directive")
            })
            .collect()
    }
}
