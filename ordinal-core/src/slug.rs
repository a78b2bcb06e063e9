//! Slug generation for filenames, wikilink targets and heading anchors.

use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

/// Convert a title or filename stem into a slug
///
/// Rules:
/// - Lowercase
/// - Trim surrounding whitespace
/// - Replace each inner whitespace grapheme with a hyphen
///
/// Punctuation is kept, so `[[C++]]` and `c++.md` still agree.
///
/// # Examples
///
/// ```
/// use ordinal_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("  Rust Notes "), "rust-notes");
/// ```
pub fn slugify(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .graphemes(true)
        .map(|g| if g.trim().is_empty() { "-" } else { g })
        .collect()
}

/// Anchor id for a heading; same rules as [`slugify`]
pub fn heading_anchor(heading: &str) -> String {
    slugify(heading)
}

/// Slug of a document derived from its file stem
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .unwrap_or_default()
}

/// Backlink source key for a page slug; the index page is the site root ("")
pub fn source_key(slug: &str) -> &str {
    if slug == "index" {
        ""
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Foo Bar"), "foo-bar");
    }

    #[test]
    fn test_mixed_case() {
        assert_eq!(slugify("CamelCase"), "camelcase");
        assert_eq!(slugify("UPPERCASE"), "uppercase");
    }

    #[test]
    fn test_punctuation_is_preserved() {
        assert_eq!(slugify("C++ Programming"), "c++-programming");
        assert_eq!(slugify("snake_case"), "snake_case");
    }

    #[test]
    fn test_each_space_becomes_a_hyphen() {
        assert_eq!(slugify("Hello  World"), "hello--world");
        assert_eq!(slugify("tab\tseparated"), "tab-separated");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café Culture"), "café-culture");
    }

    #[test]
    fn test_slug_from_path() {
        assert_eq!(slug_from_path(Path::new("content/notes/My Note.md")), "my-note");
        assert_eq!(slug_from_path(Path::new("index.md")), "index");
    }

    #[test]
    fn test_index_is_site_root() {
        assert_eq!(source_key("index"), "");
        assert_eq!(source_key("garden"), "garden");
    }
}
