//! # agentlint-core
//!
//! Configuration composition and rule-execution engine for agent
//! configuration files.
//!
//! Covers:
//! - Configuration documents with `extends`, path-scoped overrides and
//!   per-rule options ([`config`])
//! - The rule registry and rule contract ([`registry`], [`rules`])
//! - Inline `lint-disable` directives ([`directives`])
//! - Composable JSON checks for rule bodies ([`validation`])
//! - The per-file pipeline with auto-fixes ([`pipeline`])
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use agentlint_core::{Linter, RuleRegistry, TracingSink, resolve_with_extends};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = resolve_with_extends(Path::new(".agentlint.json"))?;
//! let registry = Arc::new(RuleRegistry::with_defaults());
//! let linter = Linter::from_config(config, ".", registry, Arc::new(TracingSink))?;
//! let results = linter.validate_files(&["SKILL.md"]);
//! assert!(linter.summarize(&results).passed());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod diagnostics;
pub mod directives;
pub mod file_types;
pub mod file_utils;
pub mod fixes;
pub mod parsers;
pub mod pipeline;
mod regex_util;
pub mod registry;
pub mod rules;
pub mod validation;

pub use config::{
    ConfigResolver, Configuration, Override, ResolvedRuleConfig, RuleSetting, generate_schema,
    resolve_with_extends, validate_configuration,
};
pub use context::FileContext;
pub use diagnostics::{
    CollectingSink, ConfigError, CoreError, DiagnosticSink, EngineDiagnostic,
    EngineDiagnosticKind, Fix, Issue, LintResult, Severity, TracingSink,
};
pub use directives::{Directive, DirectiveIndex, DirectiveKind};
pub use file_types::{FileKind, detect_file_kind};
pub use fixes::{FixOutcome, apply_fixes};
pub use pipeline::{FileResult, FixFilter, LintOptions, LintSummary, Linter, Progress};
pub use registry::{Deprecation, RuleMetadata, RuleProvider, RuleRegistry};
pub use rules::Rule;
