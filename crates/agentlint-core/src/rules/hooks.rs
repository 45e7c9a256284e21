//! HK-001: hooks manifest shape
//!
//! Hooks live under a top-level `hooks` object in `settings.json`,
//! `settings.local.json` and `hooks.json`:
//!
//! ```json
//! { "hooks": { "PreToolUse": [ { "matcher": "Bash", "hooks": [ { "type": "command", "command": "./check.sh" } ] } ] } }
//! ```

use super::{Rule, catalog_name};
use crate::context::FileContext;
use crate::diagnostics::{Issue, Severity};
use crate::file_types::FileKind;
use crate::parsers::{json_key_line, parse_json_value};
use crate::registry::RuleMetadata;
use crate::validation::combinators::{all, each, each_value, field, optional, sequence, when};
use crate::validation::primitives::{
    array_len, is_type, min_length, one_of_str, range, required,
};
use crate::validation::{CURRENT_KEY, CheckContext, DynCheck, JsonType, Outcome, check_fn};
use serde_json::Value;

const RULE_ID: &str = "HK-001";

const KNOWN_EVENTS: &[&str] = &[
    "PreToolUse",
    "PostToolUse",
    "Notification",
    "UserPromptSubmit",
    "Stop",
    "SubagentStop",
    "PreCompact",
    "SessionStart",
    "SessionEnd",
];

fn hook_type_is(expected: &'static str) -> impl Fn(&Value, &CheckContext) -> bool + Send + Sync {
    move |value, _| value.get("type").and_then(Value::as_str) == Some(expected)
}

/// Warn on event names the agent does not know; the key comes from
/// `each_value`.
fn known_event() -> DynCheck {
    check_fn(|_, ctx: &mut CheckContext| {
        match ctx.shared_state.get(CURRENT_KEY).and_then(Value::as_str) {
            Some(event) if !KNOWN_EVENTS.contains(&event) => Outcome::warning(format!(
                "Unknown hook event '{}' (expected one of: {})",
                event,
                KNOWN_EVENTS.join(", ")
            )),
            _ => Outcome::ok(),
        }
    })
}

fn hook_entry() -> DynCheck {
    all(vec![
        is_type(JsonType::Object),
        field(
            "type",
            sequence(vec![required(), one_of_str(&["command", "prompt"])]),
        ),
        when(
            hook_type_is("command"),
            field(
                "command",
                sequence(vec![required(), is_type(JsonType::String), min_length(1)]),
            ),
        ),
        when(
            hook_type_is("prompt"),
            field(
                "prompt",
                sequence(vec![required(), is_type(JsonType::String), min_length(1)]),
            ),
        ),
        field(
            "timeout",
            optional(sequence(vec![
                is_type(JsonType::Number),
                range(Some(1.0), Some(3600.0)),
            ])),
        ),
    ])
}

fn matcher_group() -> DynCheck {
    all(vec![
        is_type(JsonType::Object),
        field("matcher", optional(is_type(JsonType::String))),
        field(
            "hooks",
            sequence(vec![
                required(),
                is_type(JsonType::Array),
                array_len(Some(1), None),
                each(hook_entry()),
            ]),
        ),
    ])
}

/// Whole-manifest check.
pub fn hooks_manifest_schema() -> DynCheck {
    all(vec![
        is_type(JsonType::Object),
        field(
            "hooks",
            optional(sequence(vec![
                is_type(JsonType::Object),
                each_value(all(vec![
                    known_event(),
                    sequence(vec![is_type(JsonType::Array), each(matcher_group())]),
                ])),
            ])),
        ),
    ])
}

pub struct HooksManifestRule {
    meta: RuleMetadata,
    schema: DynCheck,
}

impl HooksManifestRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(RULE_ID, catalog_name(RULE_ID), Severity::Error)
                .description("Hook manifests must match the hooks schema"),
            schema: hooks_manifest_schema(),
        }
    }
}

impl Default for HooksManifestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for HooksManifestRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        if ctx.kind != FileKind::Hooks {
            return Ok(vec![]);
        }
        let value = match parse_json_value(ctx.content) {
            Ok(value) => value,
            Err(e) => {
                return Ok(vec![
                    Issue::new(RULE_ID, format!("Hooks manifest is not valid JSON: {}", e))
                        .at_line(1),
                ]);
            }
        };

        let line = json_key_line(ctx.content, "hooks").unwrap_or(1);
        let mut check_ctx = ctx.check_context();
        let outcome = self.schema.check(&value, &mut check_ctx);
        Ok(outcome
            .errors
            .into_iter()
            .chain(outcome.warnings)
            .map(|message| {
                Issue::new(RULE_ID, message)
                    .at_line(line)
                    .with_explanation("Malformed hooks are silently ignored by the agent")
            })
            .collect())
    }
}
