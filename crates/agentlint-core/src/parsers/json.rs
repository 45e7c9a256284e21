//! JSON parser for hook and plugin manifests
//!
//! ## Security
//!
//! JSON parsing is handled by serde_json which is memory-safe and handles
//! malformed input gracefully (returns errors instead of panicking).

use crate::diagnostics::{CoreError, LintResult};
use serde_json::Value;

/// Parse a JSON manifest into an untyped value.
pub fn parse_json_value(content: &str) -> LintResult<Value> {
    serde_json::from_str(content).map_err(|e| CoreError::Other(e.into()))
}

/// 1-based line of the first `"key":` occurrence in raw JSON text.
///
/// Used to attach line numbers to findings produced from an untyped value.
pub fn json_key_line(content: &str, key: &str) -> Option<usize> {
    let needle = format!("\"{}\"", key);
    content.lines().enumerate().find_map(|(idx, line)| {
        let pos = line.find(&needle)?;
        line[pos + needle.len()..]
            .trim_start()
            .starts_with(':')
            .then_some(idx + 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let value = parse_json_value(r#"{"name": "test"}"#).unwrap();
        assert_eq!(value["name"], "test");
    }

    #[test]
    fn test_parse_invalid_json_returns_error() {
        assert!(parse_json_value(r#"{"name": }"#).is_err());
        assert!(parse_json_value("").is_err());
    }

    #[test]
    fn test_json_key_line() {
        let content = "{\n  \"name\": \"x\",\n  \"version\": \"1.0.0\"\n}\n";
        assert_eq!(json_key_line(content, "name"), Some(2));
        assert_eq!(json_key_line(content, "version"), Some(3));
        assert_eq!(json_key_line(content, "missing"), None);
    }

    #[test]
    fn test_json_key_line_ignores_values() {
        let content = "{\n  \"title\": \"name\",\n  \"name\": 1\n}";
        assert_eq!(json_key_line(content, "name"), Some(3));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn parse_json_never_panics(content in ".*") {
            let _ = parse_json_value(&content);
        }

        #[test]
        fn parse_json_valid_object_succeeds(
            key in "[a-z]+",
            value in "[a-zA-Z0-9 ]*"
        ) {
            let content = format!(r#"{{"{}": "{}"}}"#, key, value);
            prop_assert!(parse_json_value(&content).is_ok());
        }
    }
}
