//! Rule contract and the built-in rules

pub mod frontmatter;
pub mod hooks;
pub mod markdown;
pub mod plugin;
pub mod skill;

use crate::context::FileContext;
use crate::diagnostics::Issue;
use crate::registry::{RuleMetadata, RuleProvider};
use std::sync::Arc;

/// A rule body plus its metadata.
///
/// `check` is called for every file the rule is enabled on and returns no
/// issues for files it does not apply to. Returning `Err` does not abort the
/// file; the linter reports it as an error issue attributed to the rule.
///
/// Issues carry a placeholder severity. The linter stamps the configured
/// severity before reporting them.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    fn check(&self, ctx: &FileContext<'_>) -> anyhow::Result<Vec<Issue>>;
}

/// Provider for the built-in rules, in catalog order.
pub struct BuiltinProvider;

impl RuleProvider for BuiltinProvider {
    fn rules(&self) -> Vec<Arc<dyn Rule>> {
        vec![
            Arc::new(frontmatter::FrontmatterParseRule::new()),
            Arc::new(skill::SkillNameRule::new()),
            Arc::new(skill::SkillDescriptionRule::new()),
            Arc::new(skill::LegacySkillNameRule::new()),
            Arc::new(hooks::HooksManifestRule::new()),
            Arc::new(plugin::PluginManifestRule::new()),
            Arc::new(markdown::TrailingWhitespaceRule::new()),
        ]
    }
}

/// Human name of a built-in rule, falling back to the id.
pub(crate) fn catalog_name(id: &str) -> &str {
    agentlint_rules::get_rule_name(id).unwrap_or(id)
}
