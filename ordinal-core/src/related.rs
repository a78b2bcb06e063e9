//! Related-article index grouped by front matter `domain` tags.

use crate::models::{Document, Frontmatter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One document listed under a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub title: String,
    pub url: String,
    pub last_modified: Option<String>,
    pub domain: Vec<String>,
    pub division: Vec<String>,
}

/// Link shown in a page's related list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
    pub title: String,
    pub url: String,
}

/// Lowercased domain -> documents, newest `last_modified` first
#[derive(Debug, Clone, Default)]
pub struct RelatedIndex {
    by_domain: BTreeMap<String, Vec<RelatedEntry>>,
}

impl RelatedIndex {
    pub fn build<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut by_domain: BTreeMap<String, Vec<RelatedEntry>> = BTreeMap::new();

        for doc in documents {
            let mut keys = doc.frontmatter.domain_keys();
            keys.dedup();
            for key in keys {
                let group = by_domain.entry(key).or_default();
                if group.iter().any(|e| e.url == doc.url()) {
                    continue;
                }
                group.push(RelatedEntry {
                    title: doc.title(),
                    url: doc.url(),
                    last_modified: doc.frontmatter.last_modified.clone(),
                    domain: doc.frontmatter.domain.clone(),
                    division: doc.frontmatter.division.clone(),
                });
            }
        }

        // Stable sort; documents without a date go last
        for group in by_domain.values_mut() {
            group.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        }

        tracing::debug!("Related index has {} domains", by_domain.len());
        Self { by_domain }
    }

    /// Documents sharing at least one domain with `frontmatter`
    ///
    /// Follows the page's own domain order, lists each URL once, and leaves
    /// out `own_url` so a page is never related to itself.
    pub fn related_to(&self, frontmatter: &Frontmatter, own_url: Option<&str>) -> Vec<RelatedArticle> {
        let mut related: Vec<RelatedArticle> = Vec::new();

        for key in frontmatter.domain_keys() {
            for entry in self.domain(&key) {
                if Some(entry.url.as_str()) == own_url || related.iter().any(|r| r.url == entry.url) {
                    continue;
                }
                related.push(RelatedArticle {
                    title: entry.title.clone(),
                    url: entry.url.clone(),
                });
            }
        }

        related
    }

    /// Entries for one domain, matched case-insensitively
    pub fn domain(&self, domain: &str) -> &[RelatedEntry] {
        self.by_domain
            .get(&domain.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageKind;
    use std::path::PathBuf;

    fn doc(path: &str, title: &str, domain: &[&str], modified: Option<&str>) -> Document {
        let source_path = PathBuf::from(path);
        Document {
            slug: crate::slug::slug_from_path(&source_path),
            category: "notes".to_string(),
            source_path,
            kind: PageKind::Article,
            frontmatter: Frontmatter {
                title: Some(title.to_string()),
                domain: domain.iter().map(|d| d.to_string()).collect(),
                last_modified: modified.map(str::to_string),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    #[test]
    fn test_related_is_symmetric_and_case_insensitive() {
        let a = doc("notes/a.md", "A", &["Rust"], Some("2024-01-01"));
        let b = doc("notes/b.md", "B", &["rust", "Go"], Some("2024-02-01"));
        let c = doc("notes/c.md", "C", &["Python"], None);
        let index = RelatedIndex::build([&a, &b, &c]);

        let for_a = index.related_to(&a.frontmatter, Some(a.url().as_str()));
        let for_b = index.related_to(&b.frontmatter, Some(b.url().as_str()));

        assert_eq!(for_a.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(), ["B"]);
        assert_eq!(for_b.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(), ["A"]);
        assert!(index.related_to(&c.frontmatter, Some(c.url().as_str())).is_empty());
    }

    #[test]
    fn test_groups_sorted_newest_first() {
        let old = doc("notes/old.md", "Old", &["garden"], Some("2023-05-01"));
        let undated = doc("notes/undated.md", "Undated", &["garden"], None);
        let new = doc("notes/new.md", "New", &["Garden"], Some("2024-05-01"));
        let index = RelatedIndex::build([&old, &undated, &new]);

        let titles: Vec<&str> = index.domain("GARDEN").iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["New", "Old", "Undated"]);
    }

    #[test]
    fn test_shared_in_two_domains_listed_once() {
        let a = doc("notes/a.md", "A", &["x", "y"], None);
        let b = doc("notes/b.md", "B", &["x", "y"], None);
        let index = RelatedIndex::build([&a, &b]);

        assert_eq!(index.related_to(&a.frontmatter, Some(a.url().as_str())).len(), 1);
    }

    #[test]
    fn test_without_own_url_includes_self() {
        let a = doc("notes/a.md", "A", &["x"], None);
        let index = RelatedIndex::build([&a]);

        assert_eq!(index.related_to(&a.frontmatter, None).len(), 1);
    }
}
