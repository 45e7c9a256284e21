//! Configuration documents: types, loading and merging.
//!
//! A [`Configuration`] is what the user writes. Inheritance is resolved by
//! [`resolve_with_extends`], per-file rule settings by [`ConfigResolver`], and
//! the fail-fast checks run by [`validate_configuration`].

mod extends;
mod resolver;
mod schema;


pub use extends::{MAX_EXTENDS_DEPTH, resolve_document, resolve_with_extends};
pub use resolver::{ConfigResolver, ResolvedRuleConfig, ResolvedRules};
pub use schema::{generate_schema, validate_configuration};

use crate::diagnostics::{ConfigError, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration file names probed by [`discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".agentlint.json",
    ".agentlint.yaml",
    ".agentlint.yml",
    ".agentlint.toml",
];

/// A configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Documents to inherit from: paths, `agentlint:<preset>` or package names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Extends>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleSetting>,

    /// Path-scoped rule settings; later entries win
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<Override>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_patterns: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,

    /// Fail the run when more warnings than this are reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_warnings: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_unused_disable_directives: Option<bool>,
}

/// `extends` accepts one reference or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    pub fn references(&self) -> &[String] {
        match self {
            Extends::One(reference) => std::slice::from_ref(reference),
            Extends::Many(references) => references,
        }
    }
}

/// A rule's configured setting: a bare severity or severity plus options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleSetting {
    Severity(Severity),
    Detailed {
        severity: Severity,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<Value>,
    },
}

impl RuleSetting {
    pub fn severity(&self) -> Severity {
        match self {
            RuleSetting::Severity(severity) => *severity,
            RuleSetting::Detailed { severity, .. } => *severity,
        }
    }

    pub fn options(&self) -> Option<&Value> {
        match self {
            RuleSetting::Severity(_) => None,
            RuleSetting::Detailed { options, .. } => options.as_ref(),
        }
    }
}

impl From<Severity> for RuleSetting {
    fn from(severity: Severity) -> Self {
        RuleSetting::Severity(severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Glob patterns relative to the configuration root
    #[serde(alias = "filePatterns")]
    pub files: Vec<String>,

    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl OutputConfig {
    fn merged(self, child: OutputConfig) -> OutputConfig {
        OutputConfig {
            format: child.format.or(self.format),
            verbose: child.verbose.or(self.verbose),
            color: child.color.or(self.color),
        }
    }
}

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl Configuration {
    /// Parse a document. `origin` only labels errors.
    pub fn parse(content: &str, format: ConfigFormat, origin: &Path) -> Result<Self, ConfigError> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => {
                if content.trim().is_empty() {
                    Ok(Configuration::default())
                } else {
                    serde_yaml::from_str(content).map_err(|e| e.to_string())
                }
            }
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: origin.to_path_buf(),
            message,
        })
    }

    /// Load one document without resolving `extends`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, ConfigFormat::from_path(path), path)
    }

    /// Every `(location, rule id, setting)` triple across `rules` and all
    /// override blocks, in document order.
    pub fn rule_settings(&self) -> impl Iterator<Item = (String, &str, &RuleSetting)> {
        let base = self
            .rules
            .iter()
            .map(|(id, setting)| ("rules".to_string(), id.as_str(), setting));
        let overrides = self.overrides.iter().enumerate().flat_map(|(idx, o)| {
            o.rules
                .iter()
                .map(move |(id, setting)| (format!("overrides[{}].rules", idx), id.as_str(), setting))
        });
        base.chain(overrides)
    }
}

/// Merge `child` over `parent`.
///
/// `rules` merge shallowly with the child winning per rule, `overrides` are
/// concatenated parent first, `ignorePatterns` are concatenated without
/// duplicates, `output` merges per field and scalars take the child's value
/// when it sets one. The result never carries `extends`.
pub fn merge(parent: Configuration, child: Configuration) -> Configuration {
    let mut rules = parent.rules;
    rules.extend(child.rules);

    let mut overrides = parent.overrides;
    overrides.extend(child.overrides);

    let mut ignore_patterns = parent.ignore_patterns;
    for pattern in child.ignore_patterns {
        if !ignore_patterns.contains(&pattern) {
            ignore_patterns.push(pattern);
        }
    }

    let output = match (parent.output, child.output) {
        (Some(p), Some(c)) => Some(p.merged(c)),
        (p, c) => c.or(p),
    };

    Configuration {
        extends: None,
        rules,
        overrides,
        ignore_patterns,
        output,
        max_warnings: child.max_warnings.or(parent.max_warnings),
        report_unused_disable_directives: child
            .report_unused_disable_directives
            .or(parent.report_unused_disable_directives),
    }
}

/// Find the configuration file for `dir`: the first of [`CONFIG_FILE_NAMES`]
/// that exists.
pub fn discover(dir: &Path) -> Option<std::path::PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}
