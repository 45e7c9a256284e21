use super::Configuration;
use crate::diagnostics::{
    ConfigError, DiagnosticSink, EngineDiagnostic, EngineDiagnosticKind,
};
use crate::registry::{OptionsError, RuleRegistry};
use glob::Pattern;

/// Generate a JSON Schema for configuration documents.
///
/// # Example
///
/// ```
/// let schema = agentlint_core::generate_schema();
/// let text = serde_json::to_string(&schema).unwrap();
/// assert!(text.contains("ignorePatterns"));
/// ```
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Configuration)
}

/// Check a merged configuration before any file is validated.
///
/// Unknown rule ids, options rejected by a rule's schema and malformed glob
/// patterns are fatal. References to deprecated rules are reported to `sink`
/// and do not fail the run.
pub fn validate_configuration(
    config: &Configuration,
    registry: &RuleRegistry,
    sink: &dyn DiagnosticSink,
) -> Result<(), ConfigError> {
    for (location, id, setting) in config.rule_settings() {
        let Some(meta) = registry.get(id) else {
            return Err(ConfigError::UnknownRule {
                rule: id.to_string(),
                location,
            });
        };

        if let Some(options) = setting.options() {
            match registry.validate_options(id, options) {
                Ok(()) => {}
                Err(OptionsError::Invalid(errors)) => {
                    return Err(ConfigError::InvalidOptions {
                        rule: id.to_string(),
                        location,
                        errors,
                    });
                }
                Err(OptionsError::UnknownRule) => {
                    return Err(ConfigError::UnknownRule {
                        rule: id.to_string(),
                        location,
                    });
                }
            }
        }

        if let Some(deprecation) = &meta.deprecated {
            sink.report(EngineDiagnostic {
                kind: EngineDiagnosticKind::DeprecatedRule,
                rule_id: Some(id.to_string()),
                path: None,
                message: format!("{} (configured in {})", deprecation.describe(id), location),
            });
        }
    }

    for (idx, block) in config.overrides.iter().enumerate() {
        check_globs(&block.files, &format!("overrides[{}].files", idx))?;
    }
    check_globs(&config.ignore_patterns, "ignorePatterns")
}

fn check_globs(patterns: &[String], location: &str) -> Result<(), ConfigError> {
    for pattern in patterns {
        Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
            pattern: pattern.clone(),
            location: location.to_string(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}
