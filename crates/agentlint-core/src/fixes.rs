//! Fix application for automatic corrections
//!
//! Fixes are taken in discovery order. A fix whose range overlaps one that
//! was already accepted is skipped, so the first discovered fix of an
//! overlapping group wins. Accepted fixes are then applied from the end of
//! the content backwards, which keeps every earlier byte offset valid.

use crate::diagnostics::Fix;

/// Result of applying fixes to one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Content after fixes applied
    pub content: String,
    /// Fixes that were applied, in discovery order
    pub applied: Vec<Fix>,
    /// Fixes skipped for overlapping an accepted fix or for an invalid range
    pub skipped: Vec<Fix>,
}

impl FixOutcome {
    pub fn has_changes(&self, original: &str) -> bool {
        self.content != original
    }

    pub fn applied_descriptions(&self) -> Vec<String> {
        self.applied.iter().map(|f| f.description.clone()).collect()
    }
}

/// Apply `fixes` to `content`.
pub fn apply_fixes(content: &str, fixes: &[Fix]) -> FixOutcome {
    let mut accepted: Vec<&Fix> = Vec::new();
    let mut skipped = Vec::new();

    for fix in fixes {
        if !fix.is_valid_for(content) || accepted.iter().any(|a| a.overlaps(fix)) {
            tracing::debug!(
                rule = %fix.rule_id,
                start = fix.start_byte,
                end = fix.end_byte,
                "skipping fix"
            );
            skipped.push(fix.clone());
            continue;
        }
        accepted.push(fix);
    }

    let mut ordered = accepted.clone();
    // Stable sort keeps discovery order among equal starts
    ordered.sort_by(|a, b| b.start_byte.cmp(&a.start_byte));

    let mut result = content.to_string();
    for fix in ordered {
        result.replace_range(fix.start_byte..fix.end_byte, &fix.replacement);
    }

    FixOutcome {
        content: result,
        applied: accepted.into_iter().cloned().collect(),
        skipped,
    }
}
