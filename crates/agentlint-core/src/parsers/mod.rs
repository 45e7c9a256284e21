//! Parsers for front matter and JSON manifests

pub mod frontmatter;
pub mod json;

pub use frontmatter::{FrontMatter, parse_frontmatter, split_frontmatter};
pub use json::{json_key_line, parse_json_value};
