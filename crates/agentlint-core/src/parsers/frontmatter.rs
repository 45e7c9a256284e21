//! YAML front matter splitting and parsing
//!
//! Front matter is recognised only when the very first line of the file is
//! `---`. Everything up to the next line consisting of `---` is YAML; the rest
//! is body text.

use crate::diagnostics::{CoreError, LintResult};

/// Front matter block extracted from a markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    /// Raw YAML between the fences
    pub raw: String,
    /// 1-based line of the opening `---`
    pub start_line: usize,
    /// 1-based line of the closing `---`, if the block is terminated
    pub end_line: Option<usize>,
    /// Byte offset where the body starts
    pub body_start: usize,
}

impl FrontMatter {
    /// Whether the closing fence was found.
    pub fn is_closed(&self) -> bool {
        self.end_line.is_some()
    }

    /// 1-based file line of a top-level `key:` entry.
    pub fn key_line(&self, key: &str) -> Option<usize> {
        self.raw.lines().enumerate().find_map(|(idx, line)| {
            let rest = line.strip_prefix(key)?;
            rest.trim_start()
                .starts_with(':')
                .then_some(self.start_line + 1 + idx)
        })
    }
}

/// Split front matter from content. Returns `None` when the file does not
/// open with a `---` fence.
pub fn split_frontmatter(content: &str) -> Option<FrontMatter> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let mut offset = first.len();
    let mut raw = String::new();
    for (idx, line) in lines.enumerate() {
        if line.trim_end() == "---" {
            return Some(FrontMatter {
                raw,
                start_line: 1,
                end_line: Some(idx + 2),
                body_start: offset + line.len(),
            });
        }
        raw.push_str(line);
        offset += line.len();
    }

    Some(FrontMatter {
        raw,
        start_line: 1,
        end_line: None,
        body_start: content.len(),
    })
}

/// Parse the YAML of a front matter block into a JSON value so rules can use
/// the same checks for markdown and JSON files.
pub fn parse_frontmatter(frontmatter: &FrontMatter) -> LintResult<serde_json::Value> {
    if frontmatter.raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(&frontmatter.raw)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("invalid front matter: {}", e)))?;
    serde_json::to_value(yaml)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("unsupported front matter value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let content = "---\nname: test-skill\ndescription: A test\n---\nBody\n";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.raw, "name: test-skill\ndescription: A test\n");
        assert_eq!(fm.start_line, 1);
        assert_eq!(fm.end_line, Some(4));
        assert_eq!(&content[fm.body_start..], "Body\n");
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(split_frontmatter("# Title\n").is_none());
        assert!(split_frontmatter("").is_none());
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let fm = split_frontmatter("---\nname: x\n").unwrap();
        assert!(!fm.is_closed());
        assert_eq!(fm.raw, "name: x\n");
    }

    #[test]
    fn test_key_line() {
        let fm = split_frontmatter("---\nname: a\ndescription: b\n---\n").unwrap();
        assert_eq!(fm.key_line("name"), Some(2));
        assert_eq!(fm.key_line("description"), Some(3));
        assert_eq!(fm.key_line("missing"), None);
    }

    #[test]
    fn test_parse_frontmatter_to_json() {
        let fm = split_frontmatter("---\nname: a\ntags: [x, y]\n---\n").unwrap();
        let value = parse_frontmatter(&fm).unwrap();
        assert_eq!(value["name"], "a");
        assert_eq!(value["tags"][1], "y");
    }

    #[test]
    fn test_parse_frontmatter_invalid_yaml() {
        let fm = split_frontmatter("---\nname: [unclosed\n---\n").unwrap();
        assert!(parse_frontmatter(&fm).is_err());
    }

    #[test]
    fn test_crlf_fences() {
        let fm = split_frontmatter("---\r\nname: a\r\n---\r\nbody").unwrap();
        assert!(fm.is_closed());
        assert_eq!(fm.key_line("name"), Some(2));
    }
}
