//! Per-file context handed to rule bodies.

use crate::file_types::{FileKind, detect_file_kind};
use crate::parsers::{FrontMatter, split_frontmatter};
use crate::validation::CheckContext;
use serde_json::Value;
use std::path::Path;

/// Everything a rule needs to check one file.
///
/// `path` is the path results are reported against. `disk_path` is where the
/// content can be read from the filesystem; the two differ when validating
/// caller-supplied text.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a Path,
    pub disk_path: &'a Path,
    pub content: &'a str,
    pub kind: FileKind,
    /// Resolved rule options, else the rule's defaults, else `Null`
    pub options: &'a Value,
}

impl<'a> FileContext<'a> {
    pub fn new(path: &'a Path, content: &'a str, options: &'a Value) -> Self {
        Self {
            path,
            disk_path: path,
            content,
            kind: detect_file_kind(path),
            options,
        }
    }

    pub fn with_disk_path(mut self, disk_path: &'a Path) -> Self {
        self.disk_path = disk_path;
        self
    }

    pub fn frontmatter(&self) -> Option<FrontMatter> {
        split_frontmatter(self.content)
    }

    pub fn option_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(Value::as_bool)
    }

    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }

    /// Check context seeded with this file and the rule's options.
    pub fn check_context(&self) -> CheckContext {
        CheckContext::with_options(self.options.clone()).with_file(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_defaults() {
        let options = json!({"maxLength": 10, "strict": true});
        let ctx = FileContext::new(Path::new("skills/a/SKILL.md"), "---\nname: a\n---\n", &options);
        assert_eq!(ctx.kind, FileKind::Skill);
        assert_eq!(ctx.disk_path, ctx.path);
        assert_eq!(ctx.option_u64("maxLength"), Some(10));
        assert_eq!(ctx.option_bool("strict"), Some(true));
        assert_eq!(ctx.option_bool("missing"), None);
        assert!(ctx.frontmatter().is_some());
    }

    #[test]
    fn test_check_context_carries_options() {
        let options = json!({"k": 1});
        let ctx = FileContext::new(Path::new("x.json"), "{}", &options);
        let check_ctx = ctx.check_context();
        assert_eq!(check_ctx.options, options);
        assert_eq!(check_ctx.file_path.as_deref(), Some(Path::new("x.json")));
    }
}
