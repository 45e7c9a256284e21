//! Validation pipeline: per-file rule execution, suppression and fixes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ConfigResolver, Configuration, validate_configuration};
use crate::context::FileContext;
use crate::diagnostics::{
    ConfigError, CoreError, DiagnosticSink, Issue, LintResult, Severity,
};
use crate::directives::DirectiveIndex;
use crate::file_types::detect_file_kind;
use crate::file_utils::{DEFAULT_MAX_FILE_SIZE, safe_read_file_with_limit};
use crate::fixes::apply_fixes;
use crate::registry::RuleRegistry;
use crate::rules::Rule;

/// Caller predicate choosing which issues' fixes to apply.
pub type FixFilter = Arc<dyn Fn(&Issue) -> bool + Send + Sync>;

/// Run options for a [`Linter`].
#[derive(Clone)]
pub struct LintOptions {
    /// Compute fixed output for fixable issues
    pub fix: bool,
    pub fix_filter: Option<FixFilter>,
    /// Overrides `reportUnusedDisableDirectives` from the configuration
    pub report_unused_disable_directives: Option<bool>,
    /// Files larger than this are reported instead of read
    pub max_file_size: u64,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            fix: false,
            fix_filter: None,
            report_unused_disable_directives: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl std::fmt::Debug for LintOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintOptions")
            .field("fix", &self.fix)
            .field("fix_filter", &self.fix_filter.as_ref().map(|_| "Fn(&Issue)"))
            .field(
                "report_unused_disable_directives",
                &self.report_unused_disable_directives,
            )
            .field("max_file_size", &self.max_file_size)
            .finish()
    }
}

/// Progress events of [`Linter::validate_files_with_progress`].
///
/// `FileDone` events arrive in completion order; results are still returned
/// in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Started { total: usize },
    FileDone { path: PathBuf, valid: bool },
    Finished { total: usize },
}

/// Outcome of validating one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    pub file_path: PathBuf,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_output: Option<String>,
    pub error_count: usize,
    pub warning_count: usize,
    pub fixable_count: usize,
    /// Descriptions of the fixes applied to produce `fixed_output`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied_fixes: Vec<String>,
}

impl FileResult {
    fn new(file_path: &Path, issues: Vec<Issue>) -> Self {
        let fixable_count = issues.iter().filter(|i| i.has_fix()).count();
        let (errors, warnings): (Vec<Issue>, Vec<Issue>) =
            issues.into_iter().partition(Issue::is_error);
        Self {
            file_path: file_path.to_path_buf(),
            valid: errors.is_empty(),
            error_count: errors.len(),
            warning_count: warnings.len(),
            fixable_count,
            errors,
            warnings,
            fixed_output: None,
            applied_fixes: Vec::new(),
        }
    }

    /// A result holding a single error for a file that could not be read.
    fn unreadable(file_path: &Path, error: &CoreError) -> Self {
        Self::new(
            file_path,
            vec![Issue::unattributed(Severity::Error, error.to_string()).in_file(file_path)],
        )
    }

    /// Errors then warnings, each in reporting order.
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixable: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_warnings: Option<usize>,
}

impl LintSummary {
    pub fn from_results(results: &[FileResult], max_warnings: Option<usize>) -> Self {
        Self {
            files: results.len(),
            errors: results.iter().map(|r| r.error_count).sum(),
            warnings: results.iter().map(|r| r.warning_count).sum(),
            fixable: results.iter().map(|r| r.fixable_count).sum(),
            max_warnings,
        }
    }

    pub fn too_many_warnings(&self) -> bool {
        self.max_warnings.is_some_and(|max| self.warnings > max)
    }

    /// No errors and the warning budget holds.
    pub fn passed(&self) -> bool {
        self.errors == 0 && !self.too_many_warnings()
    }
}

/// Runs registered rules over files under a resolved configuration.
pub struct Linter {
    registry: Arc<RuleRegistry>,
    resolver: Arc<ConfigResolver>,
    options: LintOptions,
}

impl Linter {
    pub fn new(registry: Arc<RuleRegistry>, resolver: Arc<ConfigResolver>) -> Self {
        Self {
            registry,
            resolver,
            options: LintOptions::default(),
        }
    }

    /// Check a merged configuration and build a linter for it.
    ///
    /// Fails on anything the configuration pre-pass rejects, before any
    /// file is touched.
    pub fn from_config(
        config: Configuration,
        root: impl Into<PathBuf>,
        registry: Arc<RuleRegistry>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, ConfigError> {
        validate_configuration(&config, &registry, sink.as_ref())?;
        let resolver = ConfigResolver::with_sink(config, Arc::clone(&registry), root, sink);
        Ok(Self::new(registry, Arc::new(resolver)))
    }

    pub fn with_options(mut self, options: LintOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Summarize results against the configured `maxWarnings`.
    pub fn summarize(&self, results: &[FileResult]) -> LintSummary {
        LintSummary::from_results(results, self.resolver.config().max_warnings)
    }

    fn report_unused_directives(&self) -> bool {
        self.options
            .report_unused_disable_directives
            .or(self.resolver.config().report_unused_disable_directives)
            .unwrap_or(false)
    }

    /// Validate files in parallel. Results follow the input order; paths
    /// matching `ignorePatterns` are left out.
    pub fn validate_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<FileResult> {
        self.validate_files_with_progress(paths, &|_| {})
    }

    pub fn validate_files_with_progress<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        on_progress: &(dyn Fn(Progress) + Sync),
    ) -> Vec<FileResult> {
        let selected: Vec<&Path> = paths
            .iter()
            .map(|p| p.as_ref())
            .filter(|path| {
                let ignored = self.resolver.is_ignored(path);
                if ignored {
                    tracing::debug!(path = %path.display(), "skipping ignored file");
                }
                !ignored
            })
            .collect();

        let total = selected.len();
        on_progress(Progress::Started { total });
        let results: Vec<FileResult> = selected
            .par_iter()
            .map(|path| {
                let result = self.validate_file(path);
                on_progress(Progress::FileDone {
                    path: path.to_path_buf(),
                    valid: result.valid,
                });
                result
            })
            .collect();
        on_progress(Progress::Finished { total });
        results
    }

    /// Validate one file. Read failures become a single-error result.
    pub fn validate_file(&self, path: &Path) -> FileResult {
        match safe_read_file_with_limit(path, self.options.max_file_size) {
            Ok(content) => self.validate_content(path, path, &content),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "file could not be read");
                FileResult::unreadable(path, &e)
            }
        }
    }

    /// Validate caller-supplied text reported as `logical_path`.
    ///
    /// The text is also written to a temporary file with the same extension,
    /// handed to rules as the on-disk location and removed when this returns.
    pub fn validate_text(&self, content: &str, logical_path: &Path) -> LintResult<FileResult> {
        use std::io::Write;

        let suffix = logical_path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let io_error = |source| CoreError::FileRead {
            path: logical_path.to_path_buf(),
            source,
        };
        let mut scratch = tempfile::Builder::new()
            .prefix("agentlint-")
            .suffix(&suffix)
            .tempfile()
            .map_err(io_error)?;
        scratch.write_all(content.as_bytes()).map_err(io_error)?;
        scratch.flush().map_err(io_error)?;

        Ok(self.validate_content(logical_path, scratch.path(), content))
    }

    fn enabled_rules(&self, path: &Path) -> Vec<(&Arc<dyn Rule>, Severity, Value)> {
        self.registry
            .rules()
            .iter()
            .filter_map(|rule| {
                let id = rule.metadata().id.as_str();
                let severity = self.resolver.get_rule_severity(id, path);
                severity
                    .is_enabled()
                    .then(|| (rule, severity, self.resolver.effective_options(id, path)))
            })
            .collect()
    }

    fn validate_content(&self, path: &Path, disk_path: &Path, content: &str) -> FileResult {
        let rules = self.enabled_rules(path);
        let per_rule: Vec<Vec<Issue>> = rules
            .par_iter()
            .map(|(rule, severity, options)| {
                let ctx = FileContext::new(path, content, options).with_disk_path(disk_path);
                run_rule(rule.as_ref(), &ctx, *severity)
            })
            .collect();

        let mut directives = DirectiveIndex::parse(content, detect_file_kind(path));
        let mut issues: Vec<Issue> = per_rule
            .into_iter()
            .flatten()
            .filter(|issue| !directives.is_suppressed(issue.line, issue.rule_id.as_deref()))
            .collect();
        if self.report_unused_directives() {
            issues.extend(directives.unused_issues(path));
        }

        let fixes: Vec<_> = if self.options.fix {
            issues
                .iter()
                .filter(|&issue| {
                    self.options
                        .fix_filter
                        .as_ref()
                        .is_none_or(|accept| accept(issue))
                })
                .filter_map(|issue| issue.auto_fix.clone())
                .collect()
        } else {
            Vec::new()
        };

        let mut result = FileResult::new(path, issues);
        if !fixes.is_empty() {
            let outcome = apply_fixes(content, &fixes);
            tracing::debug!(
                path = %path.display(),
                applied = outcome.applied.len(),
                skipped = outcome.skipped.len(),
                "applied fixes"
            );
            if outcome.has_changes(content) {
                result.applied_fixes = outcome.applied_descriptions();
                result.fixed_output = Some(outcome.content);
            }
        }
        result
    }
}

/// Run one rule and stamp its issues with the configured severity. A rule
/// that fails yields one error issue instead.
fn run_rule(rule: &dyn Rule, ctx: &FileContext<'_>, severity: Severity) -> Vec<Issue> {
    let id = rule.metadata().id.as_str();
    match rule.check(ctx) {
        Ok(issues) => issues
            .into_iter()
            .map(|mut issue| {
                issue.severity = severity;
                if issue.file.is_none() {
                    issue.file = Some(ctx.path.to_path_buf());
                }
                issue
            })
            .collect(),
        Err(e) => {
            tracing::warn!(rule = %id, path = %ctx.path.display(), error = %e, "rule failed");
            vec![
                Issue::new(id, format!("Rule {} failed: {:#}", id, e))
                    .with_severity(Severity::Error)
                    .in_file(ctx.path),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Fix;
    use crate::registry::RuleMetadata;

    struct Failing(RuleMetadata);

    impl Rule for Failing {
        fn metadata(&self) -> &RuleMetadata {
            &self.0
        }

        fn check(&self, _ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
            anyhow::bail!("boom")
        }
    }

    #[test]
    fn test_run_rule_downgrades_errors() {
        let rule = Failing(RuleMetadata::new("X-1", "x", Severity::Warn));
        let options = Value::Null;
        let ctx = FileContext::new(Path::new("a.md"), "", &options);
        let issues = run_rule(&rule, &ctx, Severity::Warn);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].rule_id.as_deref(), Some("X-1"));
        assert!(issues[0].message.contains("boom"));
    }

    #[test]
    fn test_file_result_counts() {
        let issues = vec![
            Issue::new("A", "a").with_severity(Severity::Error),
            Issue::new("B", "b")
                .with_severity(Severity::Warn)
                .with_fix(Fix::delete("B", 0, 1, "d")),
        ];
        let result = FileResult::new(Path::new("x.md"), issues);
        assert!(!result.valid);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.fixable_count, 1);
        assert_eq!(result.issues().count(), 2);
    }

    #[test]
    fn test_summary_max_warnings() {
        let warn = FileResult::new(
            Path::new("x.md"),
            vec![Issue::new("B", "b").with_severity(Severity::Warn)],
        );
        let results = vec![warn.clone(), warn];
        assert!(LintSummary::from_results(&results, None).passed());
        assert!(LintSummary::from_results(&results, Some(2)).passed());
        let summary = LintSummary::from_results(&results, Some(1));
        assert!(summary.too_many_warnings());
        assert!(!summary.passed());
    }
}
