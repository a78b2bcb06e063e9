//! Frontmatter parsing from markdown files.

use crate::models::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^---[ \t]*\n(.*?)\n---[ \t]*\n(.*)$").expect("frontmatter pattern")
    })
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body).
/// If no frontmatter is present, returns default frontmatter with the full content as body.
///
/// # Example
///
/// ```
/// use ordinal_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ncreated: 2025-01-01\n---\n## Hello World\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title.as_deref(), Some("My Post"));
/// assert_eq!(fm.created.as_deref(), Some("2025-01-01"));
/// assert!(body.starts_with("## Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, String), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    // An empty or comment-only block deserializes as null
    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        match serde_yaml::from_str::<Option<Frontmatter>>(yaml)? {
            Some(fm) => fm,
            None => Frontmatter::default(),
        }
    };

    Ok((frontmatter, body.to_string()))
}

/// Split a document, degrading on malformed YAML
///
/// A YAML failure is logged and yields empty frontmatter with an empty body,
/// so a broken file renders as an empty page instead of stopping the build.
pub fn split_document(content: &str, source: &str) -> (Frontmatter, String) {
    match parse_frontmatter(content) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!("Malformed front matter in {}: {}", source, e);
            (Frontmatter::default(), String::new())
        }
    }
}
