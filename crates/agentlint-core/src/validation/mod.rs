//! Composable checks over JSON values.
//!
//! A [`Check`] inspects a `serde_json::Value` and returns an [`Outcome`]
//! carrying errors and warnings. Primitives ([`primitives`]) cover the common
//! leaf tests; combinators ([`combinators`]) build whole-document checks out of
//! them so rule bodies never hand-roll traversal or accumulation.
//!
//! Rule option schemas are checks too: the engine validates configured
//! options by running the rule's schema check against them.
//!
//! # Example
//!
//! ```
//! use agentlint_core::validation::{combinators::*, primitives::*, run_check, JsonType};
//! use serde_json::json;
//!
//! let manifest = all(vec![
//!     is_type(JsonType::Object),
//!     field("name", sequence(vec![required(), is_type(JsonType::String), min_length(1)])),
//!     field("tags", optional(each(is_type(JsonType::String)))),
//! ]);
//!
//! assert!(run_check(&manifest, &json!({"name": "demo", "tags": ["a"]})).valid);
//! let outcome = run_check(&manifest, &json!({"tags": [1]}));
//! assert_eq!(outcome.errors.len(), 2);
//! ```

pub mod combinators;
pub mod primitives;

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub use primitives::JsonType;

/// Shared-state key holding the key currently visited by `each_value`.
pub const CURRENT_KEY: &str = "currentKey";

/// Result of running a check.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    /// A passing outcome that still carries a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: vec![message.into()],
        }
    }

    /// Fold `other` into `self`: messages concatenate, validity ANDs.
    pub fn merge(&mut self, other: Outcome) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::ok()
    }
}

/// State threaded through a check run.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    pub file_path: Option<PathBuf>,
    pub line: Option<usize>,
    /// Options of the rule running the check (`Null` when unconfigured)
    pub options: Value,
    /// Scratch space for passing data between combined checks
    pub shared_state: HashMap<String, Value>,
    path: Vec<String>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Value) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Dotted location of the value under inspection, e.g. `hooks.Stop[0]`.
    pub fn location(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !segment.starts_with('[') && !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    /// Describe the current value for messages: its location or "value".
    pub fn subject(&self) -> String {
        let location = self.location();
        if location.is_empty() {
            "value".to_string()
        } else {
            format!("'{}'", location)
        }
    }

    pub(crate) fn enter(&mut self, segment: String) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }
}

/// A validation step over a JSON value.
pub trait Check: Send + Sync {
    fn check(&self, value: &Value, ctx: &mut CheckContext) -> Outcome;
}

impl<F> Check for F
where
    F: Fn(&Value, &mut CheckContext) -> Outcome + Send + Sync,
{
    fn check(&self, value: &Value, ctx: &mut CheckContext) -> Outcome {
        self(value, ctx)
    }
}

/// Shared, type-erased check. Cheap to clone into rule metadata.
pub type DynCheck = Arc<dyn Check>;

/// Wrap a closure as a [`DynCheck`].
pub fn check_fn<F>(f: F) -> DynCheck
where
    F: Fn(&Value, &mut CheckContext) -> Outcome + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run a check against a value with an empty context.
pub fn run_check(check: &DynCheck, value: &Value) -> Outcome {
    let mut ctx = CheckContext::new();
    check.check(value, &mut ctx)
}
