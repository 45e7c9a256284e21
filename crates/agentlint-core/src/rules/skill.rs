//! Skill definition rules (SK-*)
//!
//! All three read the YAML front matter of `SKILL.md` files. Files whose front
//! matter does not parse are left to FM-001.

use super::{Rule, catalog_name};
use crate::context::FileContext;
use crate::diagnostics::{Issue, Severity};
use crate::file_types::FileKind;
use crate::parsers::{FrontMatter, parse_frontmatter};
use crate::regex_util::static_regex;
use crate::registry::{Deprecation, RuleMetadata};
use crate::validation::combinators::{all, field, map_then, optional, sequence};
use crate::validation::primitives::{is_type, min_length, only_keys, range, required};
use crate::validation::{DynCheck, JsonType};
use serde_json::{Value, json};

static_regex!(fn kebab_case_regex, r"^[a-z0-9]+(-[a-z0-9]+)*$");

const DEFAULT_MAX_NAME_LENGTH: u64 = 64;

fn skill_frontmatter(ctx: &FileContext<'_>) -> Option<(FrontMatter, Value)> {
    if ctx.kind != FileKind::Skill {
        return None;
    }
    let frontmatter = ctx.frontmatter()?;
    if !frontmatter.is_closed() {
        return None;
    }
    let value = parse_frontmatter(&frontmatter).ok()?;
    value.is_object().then_some((frontmatter, value))
}

fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_lower = true;
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
            prev_lower = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

fn name_options_schema() -> DynCheck {
    all(vec![
        is_type(JsonType::Object),
        only_keys(&["maxLength"]),
        field(
            "maxLength",
            optional(sequence(vec![
                is_type(JsonType::Integer),
                range(Some(1.0), Some(1024.0)),
            ])),
        ),
    ])
}

// ============================================================================
// SK-001
// ============================================================================

const NAME_RULE: &str = "SK-001";

/// Skill `name` must be present, kebab-case and no longer than `maxLength`.
pub struct SkillNameRule {
    meta: RuleMetadata,
}

impl SkillNameRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(NAME_RULE, catalog_name(NAME_RULE), Severity::Error)
                .description("Skill names must be kebab-case and reasonably short")
                .options(
                    name_options_schema(),
                    json!({ "maxLength": DEFAULT_MAX_NAME_LENGTH }),
                ),
        }
    }
}

impl Default for SkillNameRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SkillNameRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        let Some((frontmatter, value)) = skill_frontmatter(ctx) else {
            return Ok(vec![]);
        };
        let max_length = ctx
            .option_u64("maxLength")
            .unwrap_or(DEFAULT_MAX_NAME_LENGTH) as usize;
        let line = frontmatter
            .key_line("name")
            .unwrap_or(frontmatter.start_line);

        let Some(name) = value.get("name") else {
            return Ok(vec![
                Issue::new(NAME_RULE, "Skill is missing a 'name' field")
                    .at_line(frontmatter.start_line)
                    .with_how_to_fix("Add 'name: <kebab-case-name>' to the front matter"),
            ]);
        };
        let Some(name) = name.as_str() else {
            return Ok(vec![
                Issue::new(NAME_RULE, "Skill 'name' must be a string").at_line(line),
            ]);
        };

        let mut issues = Vec::new();
        if !kebab_case_regex().is_match(name) {
            let suggestion = to_kebab_case(name);
            let mut issue = Issue::new(
                NAME_RULE,
                format!("Skill name '{}' is not kebab-case", name),
            )
            .at_line(line)
            .with_explanation("Skill names are used as identifiers and must match ^[a-z0-9]+(-[a-z0-9]+)*$");
            if !suggestion.is_empty() {
                issue = issue.with_fix_hint(format!("Rename to '{}'", suggestion));
            }
            issues.push(issue);
        }
        let length = name.chars().count();
        if length > max_length {
            issues.push(
                Issue::new(
                    NAME_RULE,
                    format!(
                        "Skill name is {} characters long; the limit is {}",
                        length, max_length
                    ),
                )
                .at_line(line),
            );
        }
        Ok(issues)
    }
}

// ============================================================================
// SK-002
// ============================================================================

const DESCRIPTION_RULE: &str = "SK-002";

/// Skill `description` must be a non-blank string.
pub struct SkillDescriptionRule {
    meta: RuleMetadata,
    schema: DynCheck,
}

impl SkillDescriptionRule {
    pub fn new() -> Self {
        let schema = field(
            "description",
            sequence(vec![
                required(),
                is_type(JsonType::String),
                map_then(
                    |value| Value::String(value.as_str().unwrap_or_default().trim().to_string()),
                    min_length(1),
                ),
            ]),
        );
        Self {
            meta: RuleMetadata::new(
                DESCRIPTION_RULE,
                catalog_name(DESCRIPTION_RULE),
                Severity::Warn,
            )
            .description("Skills need a description so agents know when to use them"),
            schema,
        }
    }
}

impl Default for SkillDescriptionRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for SkillDescriptionRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        let Some((frontmatter, value)) = skill_frontmatter(ctx) else {
            return Ok(vec![]);
        };
        let line = frontmatter
            .key_line("description")
            .unwrap_or(frontmatter.start_line);
        let mut check_ctx = ctx.check_context();
        let outcome = self.schema.check(&value, &mut check_ctx);
        Ok(outcome
            .errors
            .into_iter()
            .map(|message| {
                Issue::new(DESCRIPTION_RULE, format!("Skill description: {}", message))
                    .at_line(line)
                    .with_how_to_fix("Describe what the skill does and when to use it")
            })
            .collect())
    }
}

// ============================================================================
// SK-003 (deprecated)
// ============================================================================

const LEGACY_NAME_RULE: &str = "SK-003";

/// Kebab-case name check kept for configurations written before SK-001
/// absorbed it.
pub struct LegacySkillNameRule {
    meta: RuleMetadata,
}

impl LegacySkillNameRule {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                LEGACY_NAME_RULE,
                catalog_name(LEGACY_NAME_RULE),
                Severity::Off,
            )
            .description("Skill names must be kebab-case")
            .deprecated(Deprecation {
                reason: "Kebab-case naming is now checked by SK-001".to_string(),
                replaced_by: vec![NAME_RULE.to_string()],
                since_version: "0.3.0".to_string(),
                remove_version: Some("1.0.0".to_string()),
                doc_url: None,
            }),
        }
    }
}

impl Default for LegacySkillNameRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LegacySkillNameRule {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>> {
        let Some((frontmatter, value)) = skill_frontmatter(ctx) else {
            return Ok(vec![]);
        };
        match value.get("name").and_then(Value::as_str) {
            Some(name) if !kebab_case_regex().is_match(name) => Ok(vec![
                Issue::new(
                    LEGACY_NAME_RULE,
                    format!("Skill name '{}' is not kebab-case", name),
                )
                .at_line(frontmatter.key_line("name").unwrap_or(frontmatter.start_line)),
            ]),
            _ => Ok(vec![]),
        }
    }
}
