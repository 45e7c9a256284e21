//! MD-001: no trailing whitespace in markdown files

use super::{Rule, catalog_name};
use crate::context::FileContext;
use crate::diagnostics::{Fix, Issue, Severity};
use crate::registry::RuleMetadata;
use crate::validation::combinators::{all, field, optional};
use crate::validation::primitives::{is_type, only_keys};
use crate::validation::JsonType;
use serde_json::json;

const RULE_ID: &str = "MD-001";

pub struct TrailingWhitespaceRule {
    meta: RuleMetadata,
}

impl TrailingWhitespaceRule {
    pub fn new() -> Self {
        let schema = all(vec![
            is_type(JsonType::Object),
            only_keys(&["allowHardBreaks"]),
            field("allowHardBreaks", optional(is_type(JsonType::Bool))),
        ]);
        Self {
            meta: RuleMetadata::new(RULE_ID, catalog_name(RULE_ID), Severity::Warn)
                .description("Lines must not end with spaces or tabs")
                .fixable()
                .options(schema, json!({ "allowHardBreaks": false })),
        }
    }
}

impl Default for TrailingWhitespaceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TrailingWhitespaceRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        if !ctx.kind.is_markdown() {
            return Ok(vec![]);
        }
        let allow_hard_breaks = ctx.option_bool("allowHardBreaks").unwrap_or(false);

        let mut issues = Vec::new();
        let mut offset = 0usize;
        for (idx, raw_line) in ctx.content.split_inclusive('\n').enumerate() {
            let line = raw_line.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim_end_matches([' ', '\t']);
            let trailing = &line[trimmed.len()..];

            // Two spaces after text is a markdown hard line break
            let hard_break = trailing == "  " && !trimmed.is_empty();
            if !trailing.is_empty() && !(allow_hard_breaks && hard_break) {
                let start = offset + trimmed.len();
                let end = offset + line.len();
                issues.push(
                    Issue::new(RULE_ID, "Trailing whitespace")
                        .at_line(idx + 1)
                        .with_fix(Fix::delete(RULE_ID, start, end, "Remove trailing whitespace")),
                );
            }
            offset += raw_line.len();
        }
        Ok(issues)
    }
}
