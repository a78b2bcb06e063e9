//! Wikilink transformation for [[target]] and [[target|text]] syntax.

use crate::slug::slugify;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static WIKILINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("wikilink pattern"));

/// `(target text, slug)` for every wikilink in raw markdown
pub fn link_targets(text: &str) -> Vec<(String, String)> {
    WIKILINK
        .captures_iter(text)
        .filter_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let target = inner.split_once('|').map_or(inner, |(t, _)| t).trim();
            let slug = slugify(target);
            (!slug.is_empty()).then(|| (target.to_string(), slug))
        })
        .collect()
}

/// Maps link slugs to page URLs
///
/// When several categories hold a page with the same slug, the category
/// listed earliest in the priority order wins. Unknown slugs resolve under
/// the default category.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    /// slug -> (category, url)
    pages: HashMap<String, Vec<(String, String)>>,
    priority: Vec<String>,
    default_category: String,
}

impl LinkResolver {
    pub fn new(priority: Vec<String>, default_category: &str) -> Self {
        Self {
            pages: HashMap::new(),
            priority,
            default_category: default_category.to_string(),
        }
    }

    /// Resolver that knows no pages
    pub fn empty(default_category: &str) -> Self {
        Self::new(Vec::new(), default_category)
    }

    /// Register a page's URL under its slug
    pub fn insert(&mut self, slug: &str, category: &str, url: &str) {
        self.pages
            .entry(slug.to_string())
            .or_default()
            .push((category.to_string(), url.to_string()));
    }

    fn rank(&self, category: &str) -> usize {
        self.priority
            .iter()
            .position(|c| c == category)
            .unwrap_or(self.priority.len())
    }

    /// URL for a slug
    pub fn resolve(&self, slug: &str) -> String {
        self.pages
            .get(slug)
            .and_then(|candidates| {
                candidates
                    .iter()
                    .min_by(|a, b| self.rank(&a.0).cmp(&self.rank(&b.0)).then(a.0.cmp(&b.0)))
            })
            .map(|(_, url)| url.clone())
            .unwrap_or_else(|| format!("/{}/{}.html", self.default_category, slug))
    }
}

/// Transformer for wikilink syntax, applied one line at a time
pub struct WikilinkTransformer<'a> {
    resolver: &'a LinkResolver,
}

impl<'a> WikilinkTransformer<'a> {
    pub fn new(resolver: &'a LinkResolver) -> Self {
        Self { resolver }
    }

    /// Replace every `[[...]]` in `line` with an anchor
    ///
    /// Returns (transformed_line, target_slugs); a target appears once per
    /// occurrence.
    pub fn transform_line(&self, line: &str) -> (String, Vec<String>) {
        let mut targets = Vec::new();

        let html = WIKILINK.replace_all(line, |caps: &Captures| {
            let inner = &caps[1];
            let (target, text) = match inner.split_once('|') {
                Some((target, text)) => (target.trim(), text.trim()),
                None => (inner.trim(), inner.trim()),
            };

            let slug = slugify(target);
            if slug.is_empty() {
                return caps[0].to_string();
            }

            let url = self.resolver.resolve(&slug);
            tracing::trace!("Wikilink [[{}]] -> {}", target, url);
            targets.push(slug);

            format!(r#"<a href="{}">{}</a>"#, url, text)
        });

        (html.into_owned(), targets)
    }
}
