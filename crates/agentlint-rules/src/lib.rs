//! Rule catalog and built-in presets for agentlint.
//!
//! This crate carries the static data shared by the engine and its front
//! ends: the list of known rule ids with their human-readable names, and the
//! named configuration presets that `extends: "agentlint:<name>"` resolves to.
//!
//! # Usage
//!
//! ```
//! use agentlint_rules::{RULES_DATA, preset};
//!
//! for (id, name) in RULES_DATA {
//!     println!("{}: {}", id, name);
//! }
//!
//! assert!(preset("recommended").is_some());
//! ```
//!
//! # Rule Categories
//!
//! - **FM-xxx**: Front matter
//! - **SK-xxx**: Agent skills
//! - **HK-xxx**: Hook manifests
//! - **PL-xxx**: Plugin manifests
//! - **MD-xxx**: Markdown text

/// Known rule ids paired with their human-readable names.
pub const RULES_DATA: &[(&str, &str)] = &[
    ("FM-001", "front-matter-parse"),
    ("SK-001", "skill-name-format"),
    ("SK-002", "skill-description-required"),
    ("SK-003", "skill-name-kebab-case"),
    ("HK-001", "hooks-manifest-shape"),
    ("PL-001", "plugin-manifest-fields"),
    ("MD-001", "no-trailing-whitespace"),
];

/// Prefix that marks an `extends` reference as a built-in preset.
pub const PRESET_PREFIX: &str = "agentlint:";

/// Built-in presets as `(name, JSON document)` pairs.
///
/// Presets are ordinary configuration documents and may extend each other.
pub const PRESETS: &[(&str, &str)] = &[
    (
        "recommended",
        r#"{
  "rules": {
    "FM-001": "error",
    "SK-001": "error",
    "SK-002": "warn",
    "HK-001": "error",
    "PL-001": "error",
    "MD-001": "off"
  }
}"#,
    ),
    (
        "strict",
        r#"{
  "extends": "agentlint:recommended",
  "rules": {
    "SK-002": "error",
    "MD-001": "warn"
  },
  "reportUnusedDisableDirectives": true,
  "maxWarnings": 0
}"#,
    ),
    (
        "all-off",
        r#"{
  "rules": {
    "FM-001": "off",
    "SK-001": "off",
    "SK-002": "off",
    "HK-001": "off",
    "PL-001": "off",
    "MD-001": "off"
  }
}"#,
    ),
];

/// Returns the total number of rules.
pub fn rule_count() -> usize {
    RULES_DATA.len()
}

/// Looks up a rule by ID, returning the name if found.
pub fn get_rule_name(id: &str) -> Option<&'static str> {
    RULES_DATA
        .iter()
        .find(|(rule_id, _)| *rule_id == id)
        .map(|(_, name)| *name)
}

/// Looks up a preset document by name (without the `agentlint:` prefix).
pub fn preset(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, document)| *document)
}

/// Names of all built-in presets, in declaration order.
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_data_not_empty() {
        assert!(!RULES_DATA.is_empty(), "RULES_DATA should not be empty");
    }

    #[test]
    fn test_rule_count() {
        assert_eq!(rule_count(), RULES_DATA.len());
    }

    #[test]
    fn test_get_rule_name() {
        assert_eq!(get_rule_name("SK-001"), Some("skill-name-format"));
        assert!(get_rule_name("NONEXISTENT-999").is_none());
    }

    #[test]
    fn test_no_duplicate_ids() {
        let mut ids: Vec<&str> = RULES_DATA.iter().map(|(id, _)| *id).collect();
        let original_len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), original_len, "Should have no duplicate rule IDs");
    }

    #[test]
    fn test_presets_are_valid_json() {
        for (name, document) in PRESETS {
            let parsed: Result<serde_json::Value, _> = serde_json::from_str(document);
            assert!(parsed.is_ok(), "preset {} is not valid JSON", name);
        }
    }

    #[test]
    fn test_presets_only_reference_known_rules() {
        for (name, document) in PRESETS {
            let parsed: serde_json::Value = serde_json::from_str(document).unwrap();
            if let Some(rules) = parsed.get("rules").and_then(|r| r.as_object()) {
                for id in rules.keys() {
                    assert!(
                        get_rule_name(id).is_some(),
                        "preset {} references unknown rule {}",
                        name,
                        id
                    );
                }
            }
        }
    }

    #[test]
    fn test_preset_lookup() {
        assert!(preset("strict").is_some());
        assert!(preset("lenient").is_none());
        assert_eq!(preset_names(), vec!["recommended", "strict", "all-off"]);
    }
}
