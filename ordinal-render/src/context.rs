//! Per-page template context.

use ordinal_core::{
    models::{Article, ExternalLink, Page, PageKind, SiteIndex, TocEntry},
    Config, RelatedArticle,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder for metadata a page does not set
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of entries in a section page's `latest_articles`
pub const LATEST_ARTICLES: usize = 5;

/// A label/value row in a page's metadata block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaItem {
    pub label: &'static str,
    pub value: String,
}

/// A page linking to the one being rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BacklinkEntry {
    /// Source key as recorded in the graph ("" for the index page)
    pub slug: String,
    pub title: String,
    pub url: String,
}

/// A document listed on its category's section page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub created: String,
    pub domain: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
}

/// Everything a page template can reference
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub description: String,
    pub page_meta: Vec<MetaItem>,
    /// All articles joined into one HTML string
    pub content: String,
    pub articles: Vec<Article>,
    pub footnotes: BTreeMap<String, String>,
    pub toc: Vec<TocEntry>,
    pub backlinks: Vec<BacklinkEntry>,
    pub external_links: Vec<ExternalLink>,
    pub related_articles: Vec<RelatedArticle>,

    /// Section pages only: domain -> documents in the category
    pub categorized_articles: Option<BTreeMap<String, Vec<ArticleSummary>>>,
    /// Section pages only: newest documents by `created`
    pub latest_articles: Option<Vec<ArticleSummary>>,

    pub site: SiteMeta,
    pub url: String,
    pub category: String,
    pub kind: PageKind,
}

impl PageContext {
    pub fn build(page: &Page, index: &SiteIndex, config: &Config) -> Self {
        let document = &page.document;
        let fm = &document.frontmatter;
        let url = document.url();

        let (categorized_articles, latest_articles) = if document.kind == PageKind::Section {
            let summaries = section_summaries(page, index);
            (
                Some(group_by_domain(&summaries)),
                Some(summaries.into_iter().take(LATEST_ARTICLES).collect()),
            )
        } else {
            (None, None)
        };

        Self {
            title: fm.title.clone().unwrap_or_else(|| config.site.title.clone()),
            description: fm
                .description
                .clone()
                .unwrap_or_else(|| config.site.description.clone()),
            page_meta: page_meta(page),
            content: page.content_html(),
            articles: page.articles.clone(),
            footnotes: page.footnotes.clone(),
            toc: page.toc.clone(),
            backlinks: backlinks(page, index),
            external_links: page.external_links.clone(),
            related_articles: index.related.related_to(fm, Some(url.as_str())),
            categorized_articles,
            latest_articles,
            site: SiteMeta {
                title: config.site.title.clone(),
                description: config.site.description.clone(),
            },
            url,
            category: document.category.clone(),
            kind: document.kind,
        }
    }
}

fn or_na(value: Option<&String>) -> String {
    value.cloned().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn join_or_na(values: &[String]) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(", ")
    }
}

/// Domain, Modified, Worked, Division, in that order
fn page_meta(page: &Page) -> Vec<MetaItem> {
    let fm = &page.document.frontmatter;
    vec![
        MetaItem {
            label: "Domain",
            value: join_or_na(&fm.domain),
        },
        MetaItem {
            label: "Modified",
            value: or_na(fm.last_modified.as_ref()),
        },
        MetaItem {
            label: "Worked",
            value: or_na(fm.worked.as_ref()),
        },
        MetaItem {
            label: "Division",
            value: join_or_na(&fm.division),
        },
    ]
}

fn backlinks(page: &Page, index: &SiteIndex) -> Vec<BacklinkEntry> {
    index
        .graph
        .lookup(&page.document.slug)
        .iter()
        .map(|source| {
            let slug = if source.is_empty() { "index" } else { source.as_str() };
            match index.find_by_slug(slug) {
                Some(linking) => BacklinkEntry {
                    slug: source.clone(),
                    title: linking.document.title(),
                    url: linking.document.url(),
                },
                None => BacklinkEntry {
                    slug: source.clone(),
                    title: slug.to_string(),
                    url: format!("/{}.html", slug),
                },
            }
        })
        .collect()
}

/// The category's other documents, newest `created` first
fn section_summaries(section: &Page, index: &SiteIndex) -> Vec<ArticleSummary> {
    let mut summaries: Vec<ArticleSummary> = index
        .pages_in_category(&section.document.category)
        .filter(|p| p.document.kind == PageKind::Article)
        .map(|p| {
            let fm = &p.document.frontmatter;
            ArticleSummary {
                title: p.document.title(),
                url: p.document.url(),
                created: fm.created.clone().unwrap_or_else(|| String::from("Unknown")),
                domain: fm
                    .domain
                    .first()
                    .cloned()
                    .unwrap_or_else(|| String::from("Uncategorized")),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.created.cmp(&a.created));
    summaries
}

fn group_by_domain(summaries: &[ArticleSummary]) -> BTreeMap<String, Vec<ArticleSummary>> {
    let mut grouped: BTreeMap<String, Vec<ArticleSummary>> = BTreeMap::new();
    for summary in summaries {
        grouped
            .entry(summary.domain.clone())
            .or_default()
            .push(summary.clone());
    }
    grouped
}
