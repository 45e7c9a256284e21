//! FM-001: front matter must be a terminated, parseable YAML block

use super::{Rule, catalog_name};
use crate::context::FileContext;
use crate::diagnostics::{Issue, Severity};
use crate::parsers::parse_frontmatter;
use crate::registry::RuleMetadata;

const RULE_ID: &str = "FM-001";

pub struct FrontmatterParseRule {
    meta: RuleMetadata,
}

impl FrontmatterParseRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(RULE_ID, catalog_name(RULE_ID), Severity::Error)
                .description("Front matter in markdown files must be valid YAML"),
        }
    }
}

impl Default for FrontmatterParseRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for FrontmatterParseRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        if !ctx.kind.is_markdown() {
            return Ok(vec![]);
        }
        let Some(frontmatter) = ctx.frontmatter() else {
            return Ok(vec![]);
        };

        if !frontmatter.is_closed() {
            return Ok(vec![
                Issue::new(RULE_ID, "Front matter is not terminated")
                    .at_line(frontmatter.start_line)
                    .with_fix_hint("Close the block with a line containing only '---'"),
            ]);
        }

        match parse_frontmatter(&frontmatter) {
            Ok(value) if value.is_object() => Ok(vec![]),
            Ok(_) => Ok(vec![
                Issue::new(RULE_ID, "Front matter must be a mapping of keys to values")
                    .at_line(frontmatter.start_line),
            ]),
            Err(e) => Ok(vec![
                Issue::new(RULE_ID, format!("Front matter is not valid YAML: {}", e))
                    .at_line(frontmatter.start_line)
                    .with_explanation("Agents read front matter as YAML; a parse failure hides every field"),
            ]),
        }
    }
}
