//! Rule registry and rule metadata.
//!
//! The registry is built once at startup and handed to the configuration
//! resolver and the linter. Nothing in the engine reaches for a global
//! catalog, so tests can build as many independent registries as they like.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::diagnostics::Severity;
use crate::rules::{BuiltinProvider, Rule};
use crate::validation::{CheckContext, DynCheck};

/// Deprecation record of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub reason: String,
    pub replaced_by: Vec<String>,
    pub since_version: String,
    pub remove_version: Option<String>,
    pub doc_url: Option<String>,
}

impl Deprecation {
    /// One-line description used in engine diagnostics.
    pub fn describe(&self, rule_id: &str) -> String {
        let mut message = format!(
            "Rule '{}' is deprecated since {}: {}",
            rule_id, self.since_version, self.reason
        );
        if !self.replaced_by.is_empty() {
            message.push_str(&format!(". Use {} instead", self.replaced_by.join(", ")));
        }
        if let Some(version) = &self.remove_version {
            message.push_str(&format!(". It will be removed in {}", version));
        }
        if let Some(url) = &self.doc_url {
            message.push_str(&format!(" (see {})", url));
        }
        message
    }
}

/// Static description of a rule. Immutable once registered.
#[derive(Clone)]
pub struct RuleMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    pub default_severity: Severity,
    pub fixable: bool,
    pub deprecated: Option<Deprecation>,
    pub option_schema: Option<DynCheck>,
    pub default_options: Option<Value>,
}

impl RuleMetadata {
    pub fn new(id: &str, name: &str, default_severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            default_severity,
            fixable: false,
            deprecated: None,
            option_schema: None,
            default_options: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn fixable(mut self) -> Self {
        self.fixable = true;
        self
    }

    pub fn deprecated(mut self, deprecation: Deprecation) -> Self {
        self.deprecated = Some(deprecation);
        self
    }

    pub fn options(mut self, schema: DynCheck, defaults: Value) -> Self {
        self.option_schema = Some(schema);
        self.default_options = Some(defaults);
        self
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }
}

impl std::fmt::Debug for RuleMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleMetadata")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("default_severity", &self.default_severity)
            .field("fixable", &self.fixable)
            .field("deprecated", &self.deprecated)
            .field("option_schema", &self.option_schema.as_ref().map(|_| "Check(...)"))
            .field("default_options", &self.default_options)
            .finish()
    }
}

/// Why a rule's options were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    UnknownRule,
    Invalid(Vec<String>),
}

/// A provider of rules.
///
/// Implement this trait to supply rules from outside the crate (a plugin or
/// a project-specific rule set).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use agentlint_core::{Rule, RuleProvider, RuleRegistry};
///
/// struct MyProvider;
///
/// impl RuleProvider for MyProvider {
///     fn rules(&self) -> Vec<Arc<dyn Rule>> {
///         vec![]
///     }
/// }
///
/// let registry = RuleRegistry::builder()
///     .with_defaults()
///     .with_provider(&MyProvider)
///     .build();
/// assert!(registry.exists("SK-001"));
/// ```
pub trait RuleProvider: Send + Sync {
    fn rules(&self) -> Vec<Arc<dyn Rule>>;
}

/// Catalog mapping rule ids to metadata and rule bodies.
///
/// Read-only once built; lookups tolerate an empty registry.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    index: HashMap<String, usize>,
}

impl RuleRegistry {
    /// Create an empty registry with no registered rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in rules.
    pub fn with_defaults() -> Self {
        Self::builder().with_defaults().build()
    }

    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::new()
    }

    /// Register a rule. A rule with an id that is already present replaces
    /// the earlier registration in place.
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        let id = rule.metadata().id.clone();
        match self.index.get(&id) {
            Some(&slot) => {
                tracing::debug!(rule = %id, "replacing previously registered rule");
                self.rules[slot] = rule;
            }
            None => {
                self.index.insert(id, self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&RuleMetadata> {
        self.rule(id).map(|rule| rule.metadata())
    }

    pub fn rule(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.index.get(id).map(|&slot| &self.rules[slot])
    }

    pub fn exists(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Metadata of every rule in registration order.
    pub fn get_all(&self) -> Vec<&RuleMetadata> {
        self.rules.iter().map(|rule| rule.metadata()).collect()
    }

    /// Rule bodies in registration order.
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replacement ids of a deprecated rule; empty for live or unknown rules.
    pub fn replacement_for(&self, id: &str) -> Vec<String> {
        self.get(id)
            .and_then(|meta| meta.deprecated.as_ref())
            .map(|d| d.replaced_by.clone())
            .unwrap_or_default()
    }

    /// Validate configured options against a rule's schema.
    ///
    /// This is the single option-validation step. The configuration
    /// pre-pass turns an `Err` into a fatal error; the per-file resolver
    /// turns it into a diagnostic and drops the rule.
    pub fn validate_options(&self, id: &str, options: &Value) -> Result<(), OptionsError> {
        let meta = self.get(id).ok_or(OptionsError::UnknownRule)?;
        if !options.is_object() {
            return Err(OptionsError::Invalid(vec![
                "options must be an object".to_string(),
            ]));
        }
        let Some(schema) = &meta.option_schema else {
            return Ok(());
        };
        let mut ctx = CheckContext::with_options(options.clone());
        let outcome = schema.check(options, &mut ctx);
        if outcome.valid {
            Ok(())
        } else {
            Err(OptionsError::Invalid(outcome.errors))
        }
    }
}

/// Builder for a [`RuleRegistry`].
pub struct RuleRegistryBuilder {
    entries: Vec<Arc<dyn Rule>>,
}

impl RuleRegistryBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add the built-in rules.
    pub fn with_defaults(&mut self) -> &mut Self {
        self.with_provider(&BuiltinProvider)
    }

    pub fn with_provider(&mut self, provider: &dyn RuleProvider) -> &mut Self {
        self.entries.extend(provider.rules());
        self
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) -> &mut Self {
        self.entries.push(rule);
        self
    }

    /// Produce a registry. Drains the builder.
    pub fn build(&mut self) -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for rule in std::mem::take(&mut self.entries) {
            registry.register(rule);
        }
        registry
    }
}
