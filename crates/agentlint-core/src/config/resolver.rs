//! Per-file rule resolution.

use super::{Configuration, RuleSetting};
use crate::diagnostics::{
    DiagnosticSink, EngineDiagnostic, EngineDiagnosticKind, Severity, TracingSink,
};
use crate::registry::{OptionsError, RuleRegistry};
use dashmap::DashMap;
use glob::{MatchOptions, Pattern};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Effective setting of one rule for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRuleConfig {
    pub rule_id: String,
    pub severity: Severity,
    /// Zero or one options object
    pub options: Vec<Value>,
}

pub type ResolvedRules = BTreeMap<String, ResolvedRuleConfig>;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    fn compile(
        sources: &[String],
        location: &str,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            match Pattern::new(source) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => sink.report(EngineDiagnostic {
                    kind: EngineDiagnosticKind::IgnoredPattern,
                    rule_id: None,
                    path: None,
                    message: format!("Skipping invalid glob '{}' in {}: {}", source, location, e),
                }),
            }
        }
        Self { patterns }
    }

    /// Match a root-relative, `/`-separated path. Patterns without a
    /// separator also match the bare file name.
    fn matches(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.patterns.iter().any(|pattern| {
            pattern.matches_with(relative, MATCH_OPTIONS)
                || (!pattern.as_str().contains('/')
                    && pattern.matches_with(file_name, MATCH_OPTIONS))
        })
    }
}

/// Computes and caches the effective rule settings of each file.
///
/// The cache is append-only and keyed by path. A long-lived host must build
/// a new resolver, or call [`ConfigResolver::clear_cache`], when the
/// configuration changes.
pub struct ConfigResolver {
    config: Configuration,
    registry: Arc<RuleRegistry>,
    root: PathBuf,
    override_patterns: Vec<PatternSet>,
    ignore_patterns: PatternSet,
    sink: Arc<dyn DiagnosticSink>,
    cache: DashMap<PathBuf, Arc<ResolvedRules>>,
}

impl ConfigResolver {
    /// Create a resolver for a merged configuration. `root` is the directory
    /// override and ignore patterns are relative to; a relative root is
    /// anchored at the working directory.
    pub fn new(config: Configuration, registry: Arc<RuleRegistry>, root: impl Into<PathBuf>) -> Self {
        Self::with_sink(config, registry, root, Arc::new(TracingSink))
    }

    pub fn with_sink(
        config: Configuration,
        registry: Arc<RuleRegistry>,
        root: impl Into<PathBuf>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let override_patterns = config
            .overrides
            .iter()
            .enumerate()
            .map(|(idx, o)| PatternSet::compile(&o.files, &format!("overrides[{}]", idx), sink.as_ref()))
            .collect();
        let ignore_patterns = PatternSet::compile(&config.ignore_patterns, "ignorePatterns", sink.as_ref());
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            config,
            registry,
            root,
            override_patterns,
            ignore_patterns,
            sink,
            cache: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Path relative to the root with `/` separators and no `./` prefix.
    ///
    /// Relative paths are tried as given and then anchored at the working
    /// directory. A path outside the root is matched as given.
    pub fn relative_path(&self, path: &Path) -> String {
        let anchored = path
            .is_relative()
            .then(|| std::path::absolute(path).ok())
            .flatten();
        let relative = path
            .strip_prefix(&self.root)
            .ok()
            .or_else(|| anchored.as_deref()?.strip_prefix(&self.root).ok())
            .unwrap_or(path);
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Effective rule settings for `path`. Repeated calls return the cached
    /// mapping.
    pub fn resolve_for_file(&self, path: &Path) -> Arc<ResolvedRules> {
        if let Some(hit) = self.cache.get(path) {
            return Arc::clone(hit.value());
        }
        // Computed outside the map so no shard lock is held while the sink
        // runs; a concurrent fill of the same path yields an equal value.
        let computed = Arc::new(self.compute(path));
        let entry = self.cache.entry(path.to_path_buf()).or_insert(computed);
        Arc::clone(entry.value())
    }

    fn compute(&self, path: &Path) -> ResolvedRules {
        let relative = self.relative_path(path);

        let mut settings: BTreeMap<&str, &RuleSetting> = self
            .config
            .rules
            .iter()
            .map(|(id, setting)| (id.as_str(), setting))
            .collect();
        for (block, patterns) in self.config.overrides.iter().zip(&self.override_patterns) {
            if patterns.matches(&relative) {
                for (id, setting) in &block.rules {
                    settings.insert(id.as_str(), setting);
                }
            }
        }

        let mut resolved = ResolvedRules::new();
        for (id, setting) in settings {
            let options = match setting.options() {
                None => Vec::new(),
                Some(options) => match self.registry.validate_options(id, options) {
                    Ok(()) | Err(OptionsError::UnknownRule) => vec![options.clone()],
                    Err(OptionsError::Invalid(errors)) => {
                        self.sink.report(EngineDiagnostic {
                            kind: EngineDiagnosticKind::InvalidOptions,
                            rule_id: Some(id.to_string()),
                            path: Some(path.to_path_buf()),
                            message: format!(
                                "Invalid options for rule '{}', rule disabled for this file: {}",
                                id,
                                errors.join("; ")
                            ),
                        });
                        continue;
                    }
                },
            };
            resolved.insert(
                id.to_string(),
                ResolvedRuleConfig {
                    rule_id: id.to_string(),
                    severity: setting.severity(),
                    options,
                },
            );
        }

        tracing::debug!(path = %relative, rules = resolved.len(), "resolved rule configuration");
        resolved
    }

    /// Whether `id` runs on `path`. Unconfigured rules fall back to the
    /// registry default severity, so a registered rule whose default is
    /// `off` (every deprecated rule) stays disabled until configured. This
    /// is narrower than "enabled iff registered" on purpose.
    pub fn is_rule_enabled(&self, id: &str, path: &Path) -> bool {
        self.get_rule_severity(id, path).is_enabled()
    }

    pub fn get_rule_severity(&self, id: &str, path: &Path) -> Severity {
        match self.resolve_for_file(path).get(id) {
            Some(resolved) => resolved.severity,
            None => self
                .registry
                .get(id)
                .map(|meta| meta.default_severity)
                .unwrap_or(Severity::Off),
        }
    }

    /// Configured options for `id` on `path`: empty or one element.
    pub fn get_rule_options(&self, id: &str, path: &Path) -> Vec<Value> {
        self.resolve_for_file(path)
            .get(id)
            .map(|resolved| resolved.options.clone())
            .unwrap_or_default()
    }

    /// Configured options, else the rule's defaults, else `Null`.
    pub fn effective_options(&self, id: &str, path: &Path) -> Value {
        self.get_rule_options(id, path)
            .into_iter()
            .next()
            .or_else(|| self.registry.get(id).and_then(|meta| meta.default_options.clone()))
            .unwrap_or(Value::Null)
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns.matches(&self.relative_path(path))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("root", &self.root)
            .field("rules", &self.config.rules.len())
            .field("overrides", &self.config.overrides.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}
