//! Leaf checks.
//!
//! Apart from [`required`] and [`is_type`], primitives pass on values of a
//! type they do not apply to, so type errors are reported once by whichever
//! check owns them.

use super::{CheckContext, DynCheck, Outcome, check_fn};
use regex::Regex;
use serde_json::Value;

/// JSON value types understood by [`is_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    Null,
    Bool,
    Number,
    Integer,
    String,
    Array,
    Object,
}

impl JsonType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            JsonType::Null => value.is_null(),
            JsonType::Bool => value.is_boolean(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
            JsonType::String => value.is_string(),
            JsonType::Array => value.is_array(),
            JsonType::Object => value.is_object(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Bool => "a boolean",
            JsonType::Number => "a number",
            JsonType::Integer => "an integer",
            JsonType::String => "a string",
            JsonType::Array => "an array",
            JsonType::Object => "an object",
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Always succeeds.
pub fn pass() -> DynCheck {
    check_fn(|_, _| Outcome::ok())
}

/// Always fails with `message`.
pub fn fail(message: impl Into<String>) -> DynCheck {
    let message = message.into();
    check_fn(move |_, ctx: &mut CheckContext| {
        let location = ctx.location();
        if location.is_empty() {
            Outcome::error(message.clone())
        } else {
            Outcome::error(format!("{}: {}", location, message))
        }
    })
}

/// Fails on `null` (which also stands for an absent key).
pub fn required() -> DynCheck {
    check_fn(|value, ctx: &mut CheckContext| {
        if value.is_null() {
            Outcome::error(format!("{} is required", ctx.subject()))
        } else {
            Outcome::ok()
        }
    })
}

pub fn is_type(expected: JsonType) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        if expected.matches(value) {
            Outcome::ok()
        } else {
            Outcome::error(format!(
                "{} must be {}, found {}",
                ctx.subject(),
                expected.name(),
                type_name(value)
            ))
        }
    })
}

/// Minimum string length in characters.
pub fn min_length(min: usize) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| match value.as_str() {
        Some(s) if s.chars().count() < min => Outcome::error(format!(
            "{} must be at least {} characters",
            ctx.subject(),
            min
        )),
        _ => Outcome::ok(),
    })
}

/// Maximum string length in characters.
pub fn max_length(max: usize) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| match value.as_str() {
        Some(s) if s.chars().count() > max => Outcome::error(format!(
            "{} must be at most {} characters",
            ctx.subject(),
            max
        )),
        _ => Outcome::ok(),
    })
}

/// Inclusive numeric bounds; either side may be open.
pub fn range(min: Option<f64>, max: Option<f64>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let Some(n) = value.as_f64() else {
            return Outcome::ok();
        };
        if min.is_some_and(|m| n < m) || max.is_some_and(|m| n > m) {
            let bounds = match (min, max) {
                (Some(lo), Some(hi)) => format!("between {} and {}", lo, hi),
                (Some(lo), None) => format!("at least {}", lo),
                (None, Some(hi)) => format!("at most {}", hi),
                (None, None) => return Outcome::ok(),
            };
            Outcome::error(format!("{} must be {}", ctx.subject(), bounds))
        } else {
            Outcome::ok()
        }
    })
}

/// String must match `pattern`; `description` names the expected shape.
pub fn matches(pattern: Regex, description: impl Into<String>) -> DynCheck {
    let description = description.into();
    check_fn(move |value, ctx: &mut CheckContext| match value.as_str() {
        Some(s) if !pattern.is_match(s) => {
            Outcome::error(format!("{} must be {}", ctx.subject(), description))
        }
        _ => Outcome::ok(),
    })
}

/// Value must equal one of `allowed`.
pub fn one_of(allowed: Vec<Value>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        if value.is_null() || allowed.contains(value) {
            Outcome::ok()
        } else {
            let listed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
            Outcome::error(format!(
                "{} must be one of {}, found {}",
                ctx.subject(),
                listed.join(", "),
                value
            ))
        }
    })
}

/// Convenience form of [`one_of`] for string sets.
pub fn one_of_str(allowed: &[&str]) -> DynCheck {
    one_of(allowed.iter().map(|s| Value::String(s.to_string())).collect())
}

/// Inclusive array length bounds.
pub fn array_len(min: Option<usize>, max: Option<usize>) -> DynCheck {
    check_fn(move |value, ctx: &mut CheckContext| {
        let Some(items) = value.as_array() else {
            return Outcome::ok();
        };
        if let Some(lo) = min
            && items.len() < lo
        {
            return Outcome::error(format!(
                "{} must contain at least {} item(s)",
                ctx.subject(),
                lo
            ));
        }
        if let Some(hi) = max
            && items.len() > hi
        {
            return Outcome::error(format!(
                "{} must contain at most {} item(s)",
                ctx.subject(),
                hi
            ));
        }
        Outcome::ok()
    })
}

/// Object must contain every key in `keys`. One error per missing key.
pub fn has_keys(keys: &[&str]) -> DynCheck {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    check_fn(move |value, ctx: &mut CheckContext| {
        let Some(map) = value.as_object() else {
            return Outcome::ok();
        };
        let mut outcome = Outcome::ok();
        for key in keys.iter().filter(|k| !map.contains_key(k.as_str())) {
            outcome.merge(Outcome::error(format!(
                "{} is missing required key '{}'",
                ctx.subject(),
                key
            )));
        }
        outcome
    })
}

/// Object may only contain keys in `allowed`.
pub fn only_keys(allowed: &[&str]) -> DynCheck {
    let allowed: Vec<String> = allowed.iter().map(|k| k.to_string()).collect();
    check_fn(move |value, ctx: &mut CheckContext| {
        let Some(map) = value.as_object() else {
            return Outcome::ok();
        };
        let mut outcome = Outcome::ok();
        for key in map.keys().filter(|k| !allowed.contains(k)) {
            outcome.merge(Outcome::error(format!(
                "{} has unknown key '{}' (expected one of: {})",
                ctx.subject(),
                key,
                allowed.join(", ")
            )));
        }
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::run_check;
    use serde_json::json;

    #[test]
    fn test_pass_and_fail() {
        assert!(run_check(&pass(), &Value::Null).valid);
        let outcome = run_check(&fail("nope"), &json!(1));
        assert!(!outcome.valid);
        assert_eq!(outcome.errors, vec!["nope"]);
    }

    #[test]
    fn test_required() {
        assert!(run_check(&required(), &json!("")).valid);
        let outcome = run_check(&required(), &Value::Null);
        assert_eq!(outcome.errors, vec!["value is required"]);
    }

    #[test]
    fn test_is_type() {
        assert!(run_check(&is_type(JsonType::Integer), &json!(3)).valid);
        assert!(!run_check(&is_type(JsonType::Integer), &json!(3.5)).valid);
        let outcome = run_check(&is_type(JsonType::Object), &json!([1]));
        assert_eq!(outcome.errors, vec!["value must be an object, found array"]);
    }

    #[test]
    fn test_lengths_count_chars() {
        assert!(run_check(&max_length(3), &json!("héé")).valid);
        assert!(!run_check(&max_length(2), &json!("héé")).valid);
        assert!(!run_check(&min_length(4), &json!("abc")).valid);
        // Non-strings are not this check's business
        assert!(run_check(&min_length(4), &json!(12)).valid);
    }

    #[test]
    fn test_range() {
        let check = range(Some(1.0), Some(10.0));
        assert!(run_check(&check, &json!(1)).valid);
        assert!(run_check(&check, &json!(10)).valid);
        let outcome = run_check(&check, &json!(11));
        assert_eq!(outcome.errors, vec!["value must be between 1 and 10"]);
        assert!(!run_check(&range(None, Some(0.0)), &json!(0.5)).valid);
    }

    #[test]
    fn test_matches() {
        let check = matches(Regex::new("^[a-z-]+$").unwrap(), "kebab-case");
        assert!(run_check(&check, &json!("my-skill")).valid);
        let outcome = run_check(&check, &json!("My_Skill"));
        assert_eq!(outcome.errors, vec!["value must be kebab-case"]);
    }

    #[test]
    fn test_one_of() {
        let check = one_of_str(&["command", "prompt"]);
        assert!(run_check(&check, &json!("command")).valid);
        assert!(!run_check(&check, &json!("script")).valid);
    }

    #[test]
    fn test_array_len() {
        let check = array_len(Some(1), Some(2));
        assert!(!run_check(&check, &json!([])).valid);
        assert!(run_check(&check, &json!([1, 2])).valid);
        assert!(!run_check(&check, &json!([1, 2, 3])).valid);
    }

    #[test]
    fn test_has_keys_reports_each_missing_key() {
        let outcome = run_check(&has_keys(&["name", "version"]), &json!({}));
        assert_eq!(outcome.errors.len(), 2);
        assert!(run_check(&has_keys(&["name"]), &json!({"name": 1})).valid);
    }

    #[test]
    fn test_only_keys() {
        let check = only_keys(&["maxLength"]);
        assert!(run_check(&check, &json!({"maxLength": 3})).valid);
        let outcome = run_check(&check, &json!({"maxLen": 3}));
        assert!(outcome.errors[0].contains("unknown key 'maxLen'"));
    }
}
