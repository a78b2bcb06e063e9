//! Content model structs for documents, articles, and the link graph.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Frontmatter metadata from markdown files
///
/// Every field is optional. Scalar fields accept any YAML scalar and are kept
/// as strings, so `created: 2024-05-01` and `worked: 3` both survive as text.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Frontmatter {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub domain: Vec<String>,

    #[serde(default, deserialize_with = "string_or_list")]
    pub division: Vec<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub created: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub last_modified: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub worked: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub template: Option<String>,

    /// Keys this crate does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// Domain tags lowercased for matching
    pub fn domain_keys(&self) -> Vec<String> {
        self.domain.iter().map(|d| d.to_lowercase()).collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(&other).into_iter().collect(),
    })
}

/// Role a document plays in the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// `content/index.md`
    Index,
    /// `content/<category>/<category>.md`
    Section,
    Article,
}

/// A source markdown file after front matter has been split off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path relative to the content root
    pub source_path: PathBuf,

    /// URL slug (e.g., "rust-safety")
    pub slug: String,

    /// Owning category folder
    pub category: String,

    pub kind: PageKind,

    pub frontmatter: Frontmatter,

    /// Markdown body without front matter
    pub body: String,
}

impl Document {
    /// Display title, falling back to the file stem
    pub fn title(&self) -> String {
        self.frontmatter.title.clone().unwrap_or_else(|| {
            self.source_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        })
    }

    /// Relative output path for this document (no leading slash)
    pub fn output_rel_path(&self) -> String {
        if self.kind == PageKind::Index {
            return String::from("index.html");
        }

        let dir = self
            .source_path
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.category.clone());
        format!("{}/{}.html", dir, self.slug)
    }

    /// Get the URL path for this document
    pub fn url(&self) -> String {
        format!("/{}", self.output_rel_path())
    }
}

/// A heading-delimited block of rendered body lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Rendered `<h2>` markup
    pub header: String,

    /// Rendered HTML fragments, one per source line
    pub sections: Vec<String>,
}

/// Table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub text: String,
    pub anchor: String,
    pub level: u8,
}

/// An `[text](https://...)` link found in a page body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub text: String,
    pub url: String,
}

/// A document after the markup pipeline ran over its body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub document: Document,
    pub articles: Vec<Article>,
    pub toc: Vec<TocEntry>,
    pub footnotes: BTreeMap<String, String>,

    /// Slugs this page links to, in order of first occurrence
    pub outgoing_links: Vec<String>,

    pub external_links: Vec<ExternalLink>,
}

impl Page {
    /// All article headers and sections joined into one HTML string
    pub fn content_html(&self) -> String {
        let mut html = String::new();
        for article in &self.articles {
            html.push_str(&article.header);
            html.push('\n');
            for section in &article.sections {
                html.push_str(section);
                html.push('\n');
            }
        }
        html
    }
}

/// Backlink graph keyed by link target
///
/// Each target maps to the pages linking to it, in the order those links were
/// first recorded. The index page records under the empty source key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LinkGraph {
    /// Map from target slug to list of source slugs (backlinks)
    incoming: HashMap<String, Vec<String>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a link from `source` to `target`; repeated edges are ignored
    pub fn record(&mut self, source: &str, target: &str) {
        let source = crate::slug::source_key(source);

        let sources = self.incoming.entry(target.to_string()).or_default();
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_string());
        }

        tracing::trace!("Backlinks for '{}': {:?}", target, sources);
    }

    /// Pages linking to `slug`, empty if nothing links there
    pub fn lookup(&self, slug: &str) -> &[String] {
        self.incoming.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct link targets
    pub fn target_count(&self) -> usize {
        self.incoming.len()
    }
}

/// Complete site index: every parsed page plus the shared graphs
#[derive(Debug, Clone)]
pub struct SiteIndex {
    pub pages: Vec<Page>,
    pub graph: LinkGraph,
    pub related: crate::related::RelatedIndex,
    pub categories: Vec<String>,
}

impl SiteIndex {
    /// Find a page by slug
    pub fn find_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.document.slug == slug)
    }

    /// Pages belonging to one category, excluding the index
    pub fn pages_in_category(&self, category: &str) -> impl Iterator<Item = &Page> {
        let category = category.to_string();
        self.pages
            .iter()
            .filter(move |p| p.document.kind != PageKind::Index && p.document.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(source_path: &str, category: &str, kind: PageKind) -> Document {
        let path = PathBuf::from(source_path);
        Document {
            slug: crate::slug::slug_from_path(&path),
            source_path: path,
            category: category.to_string(),
            kind,
            frontmatter: Frontmatter::default(),
            body: String::new(),
        }
    }

    #[test]
    fn test_frontmatter_scalars_and_lists() {
        let yaml = r#"
title: Gardens
domain: Botany
division: [Plants, Soil]
created: 2024-05-01
last_modified: 2024-05-03 10:15:00
worked: 3
layout: wide
"#;
        let fm: Frontmatter = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Gardens"));
        assert_eq!(fm.domain, vec!["Botany"]);
        assert_eq!(fm.division, vec!["Plants", "Soil"]);
        assert_eq!(fm.created.as_deref(), Some("2024-05-01"));
        assert_eq!(fm.last_modified.as_deref(), Some("2024-05-03 10:15:00"));
        assert_eq!(fm.worked.as_deref(), Some("3"));
        assert!(fm.extra.contains_key("layout"));
        assert_eq!(fm.domain_keys(), vec!["botany"]);
    }

    #[test]
    fn test_link_graph_is_target_keyed_and_deduplicated() {
        let mut graph = LinkGraph::new();
        graph.record("rust-safety", "memory-model");
        graph.record("ownership", "memory-model");
        graph.record("rust-safety", "memory-model");

        assert_eq!(graph.lookup("memory-model"), ["rust-safety", "ownership"]);
        assert!(graph.lookup("unknown").is_empty());
    }

    #[test]
    fn test_index_source_is_empty_key() {
        let mut graph = LinkGraph::new();
        graph.record("index", "about");

        assert_eq!(graph.lookup("about"), [""]);
    }

    #[test]
    fn test_document_urls() {
        let note = document("notes/Rust Safety.md", "notes", PageKind::Article);
        assert_eq!(note.url(), "/notes/rust-safety.html");
        assert_eq!(note.title(), "Rust Safety");

        let index = document("index.md", "articles", PageKind::Index);
        assert_eq!(index.url(), "/index.html");

        let loose = document("stray.md", "articles", PageKind::Article);
        assert_eq!(loose.output_rel_path(), "articles/stray.html");
    }
}
