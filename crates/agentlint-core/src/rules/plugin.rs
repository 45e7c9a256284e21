//! PL-001: plugin manifest fields

use super::{Rule, catalog_name};
use crate::context::FileContext;
use crate::diagnostics::{Issue, Severity};
use crate::file_types::FileKind;
use crate::parsers::{json_key_line, parse_json_value};
use crate::regex_util::static_regex;
use crate::registry::RuleMetadata;
use crate::validation::combinators::{all, field, optional, sequence};
use crate::validation::primitives::{is_type, matches, min_length, required};
use crate::validation::{CheckContext, DynCheck, JsonType, Outcome, check_fn};

const RULE_ID: &str = "PL-001";

static_regex!(fn plugin_name_regex, r"^[a-z0-9]+(-[a-z0-9]+)*$");

fn semver_version() -> DynCheck {
    check_fn(|value, ctx: &mut CheckContext| match value.as_str() {
        Some(text) => match semver::Version::parse(text) {
            Ok(_) => Outcome::ok(),
            Err(e) => Outcome::error(format!(
                "{} must be a semantic version like 1.2.3 ({})",
                ctx.subject(),
                e
            )),
        },
        None => Outcome::ok(),
    })
}

fn plugin_schema() -> DynCheck {
    all(vec![
        is_type(JsonType::Object),
        field(
            "name",
            sequence(vec![
                required(),
                is_type(JsonType::String),
                matches(plugin_name_regex().clone(), "kebab-case"),
            ]),
        ),
        field(
            "version",
            sequence(vec![required(), is_type(JsonType::String), semver_version()]),
        ),
        field(
            "description",
            optional(sequence(vec![is_type(JsonType::String), min_length(1)])),
        ),
    ])
}

pub struct PluginManifestRule {
    meta: RuleMetadata,
    schema: DynCheck,
}

impl PluginManifestRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(RULE_ID, catalog_name(RULE_ID), Severity::Error)
                .description("plugin.json needs a kebab-case name and a semantic version"),
            schema: plugin_schema(),
        }
    }
}

impl Default for PluginManifestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for PluginManifestRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        if ctx.kind != FileKind::Plugin {
            return Ok(vec![]);
        }
        let value = match parse_json_value(ctx.content) {
            Ok(value) => value,
            Err(e) => {
                return Ok(vec![
                    Issue::new(RULE_ID, format!("Plugin manifest is not valid JSON: {}", e))
                        .at_line(1),
                ]);
            }
        };

        let mut check_ctx = ctx.check_context();
        let outcome = self.schema.check(&value, &mut check_ctx);
        Ok(outcome
            .errors
            .into_iter()
            .map(|message| {
                let key = ["version", "name", "description"]
                    .into_iter()
                    .find(|key| message.starts_with(&format!("'{}'", key)));
                let line = key
                    .and_then(|key| json_key_line(ctx.content, key))
                    .unwrap_or(1);
                Issue::new(RULE_ID, message).at_line(line)
            })
            .collect())
    }
}
