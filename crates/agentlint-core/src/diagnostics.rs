//! Issue types, engine diagnostics and error reporting

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

pub type LintResult<T> = Result<T, CoreError>;

/// How a rule's findings surface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Severity::Off)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An automatic fix for an issue.
///
/// Fixes are byte-range edits against the original file content, which lets
/// the fix step detect and skip overlapping edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// Rule that produced the fix
    pub rule_id: String,
    /// Byte offset start (inclusive)
    pub start_byte: usize,
    /// Byte offset end (exclusive)
    pub end_byte: usize,
    /// Text to insert/replace with
    pub replacement: String,
    /// Human-readable description of what this fix does
    pub description: String,
}

impl Fix {
    /// Create a replacement fix
    pub fn replace(
        rule_id: &str,
        start: usize,
        end: usize,
        replacement: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            start_byte: start,
            end_byte: end,
            replacement: replacement.into(),
            description: description.into(),
        }
    }

    /// Create an insertion fix (start == end)
    pub fn insert(
        rule_id: &str,
        position: usize,
        text: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::replace(rule_id, position, position, text, description)
    }

    /// Create a deletion fix (replacement is empty)
    pub fn delete(rule_id: &str, start: usize, end: usize, description: impl Into<String>) -> Self {
        Self::replace(rule_id, start, end, String::new(), description)
    }

    /// Whether two fixes touch overlapping byte ranges.
    ///
    /// Two insertions at the same offset overlap; an insertion at the
    /// boundary of a replaced range does not.
    pub fn overlaps(&self, other: &Fix) -> bool {
        if self.start_byte == self.end_byte && other.start_byte == other.end_byte {
            return self.start_byte == other.start_byte;
        }
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }

    /// Whether the range is ordered, in bounds and on char boundaries of
    /// `content`.
    pub fn is_valid_for(&self, content: &str) -> bool {
        self.start_byte <= self.end_byte
            && self.end_byte <= content.len()
            && content.is_char_boundary(self.start_byte)
            && content.is_char_boundary(self.end_byte)
    }

    /// Apply this fix to `content`, returning `None` when the range is
    /// invalid for that content.
    pub fn apply(&self, content: &str) -> Option<String> {
        if !self.is_valid_for(content) {
            return None;
        }
        let mut out = content.to_string();
        out.replace_range(self.start_byte..self.end_byte, &self.replacement);
        Some(out)
    }
}

/// A single lint finding.
///
/// Rules create issues without a final severity; the orchestrator stamps the
/// effective severity from the resolved configuration before reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// 1-based line number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_fix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix: Option<Fix>,
}

impl Issue {
    /// Create an issue attributed to a rule. Severity defaults to error and
    /// is overwritten with the configured severity when reported.
    pub fn new(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: Some(rule_id.to_string()),
            severity: Severity::Error,
            message: message.into(),
            file: None,
            line: None,
            fix_hint: None,
            explanation: None,
            how_to_fix: None,
            auto_fix: None,
        }
    }

    /// Create an issue that no rule owns (read failures, engine notes).
    /// Such issues are never suppressible by directives.
    pub fn unattributed(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: None,
            severity,
            ..Self::new("", message)
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_how_to_fix(mut self, how_to_fix: impl Into<String>) -> Self {
        self.how_to_fix = Some(how_to_fix.into());
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.auto_fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn has_fix(&self) -> bool {
        self.auto_fix.is_some()
    }
}

/// Fatal configuration errors. Any of these aborts a run before the first
/// file is validated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Extended config '{reference}' not found (resolved to {path}, referenced from {from})")]
    MissingExtends {
        reference: String,
        path: PathBuf,
        from: PathBuf,
    },

    #[error(
        "Cannot resolve config package '{name}' from {from}. Install it with `npm install --save-dev {name}`"
    )]
    UnresolvedPackage { name: String, from: PathBuf },

    #[error("Unknown preset '{name}'. Known presets: {}", known.join(", "))]
    UnknownPreset { name: String, known: Vec<String> },

    #[error("Circular extends detected: {}", chain.join(" -> "))]
    CircularExtends { chain: Vec<String> },

    #[error("Extends chain exceeds maximum depth of {max} at {path}")]
    ExtendsTooDeep { path: PathBuf, max: usize },

    #[error("Unknown rule '{rule}' in {location}")]
    UnknownRule { rule: String, location: String },

    #[error("Invalid options for rule '{rule}' in {location}: {}", errors.join("; "))]
    InvalidOptions {
        rule: String,
        location: String,
        errors: Vec<String>,
    },

    #[error("Invalid glob pattern '{pattern}' in {location}: {message}")]
    InvalidGlobPattern {
        pattern: String,
        location: String,
        message: String,
    },
}

/// Engine errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooBig {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Not a regular file: {path}")]
    FileNotRegular { path: PathBuf },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Category of a non-fatal engine diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineDiagnosticKind {
    /// Rule options failed validation; the rule was dropped for a file.
    InvalidOptions,
    /// Configuration references a deprecated rule.
    DeprecatedRule,
    /// A glob pattern was skipped.
    IgnoredPattern,
}

/// A degraded-but-continuing condition, reported out of band from lint issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineDiagnostic {
    pub kind: EngineDiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl std::fmt::Display for EngineDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Side channel for engine diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: EngineDiagnostic);
}

/// Default sink: forwards every diagnostic to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: EngineDiagnostic) {
        tracing::warn!(
            kind = ?diagnostic.kind,
            rule = diagnostic.rule_id.as_deref().unwrap_or(""),
            "{}",
            diagnostic
        );
    }
}

/// Sink that keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<EngineDiagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<EngineDiagnostic> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: EngineDiagnostic) {
        match self.items.lock() {
            Ok(mut items) => items.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
