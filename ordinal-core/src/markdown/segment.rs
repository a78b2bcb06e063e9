//! Splits a transformed body into `##`-delimited articles and a table of contents.

use super::{ExternalLinkTransformer, LinkResolver, WikilinkTransformer};
use crate::models::{Article, ExternalLink, TocEntry};
use crate::slug::heading_anchor;

/// Result of segmenting one body
#[derive(Debug, Clone, Default)]
pub struct Segmented {
    pub articles: Vec<Article>,
    pub toc: Vec<TocEntry>,
    /// Distinct wikilink targets in order of first occurrence
    pub outgoing_links: Vec<String>,
    pub external_links: Vec<ExternalLink>,
}

pub struct Segmenter<'a> {
    wikilinks: WikilinkTransformer<'a>,
    external: ExternalLinkTransformer,
}

impl<'a> Segmenter<'a> {
    pub fn new(resolver: &'a LinkResolver) -> Self {
        Self {
            wikilinks: WikilinkTransformer::new(resolver),
            external: ExternalLinkTransformer::new(),
        }
    }

    /// Walk `text` line by line
    ///
    /// Lines before the first `## ` heading and blank lines are dropped, as
    /// are `### ` headings with no open article (they still get a TOC entry).
    pub fn segment(&self, text: &str) -> Segmented {
        let mut out = Segmented::default();
        let mut current: Option<Article> = None;

        for line in text.lines() {
            if let Some(heading) = line.strip_prefix("## ") {
                let (entry, html) = heading_entry(heading, 2);
                out.toc.push(entry);

                if let Some(article) = current.take() {
                    out.articles.push(article);
                }
                current = Some(Article {
                    header: html,
                    sections: Vec::new(),
                });
            } else if let Some(heading) = line.strip_prefix("### ") {
                let (entry, html) = heading_entry(heading, 3);
                out.toc.push(entry);

                if let Some(article) = current.as_mut() {
                    article.sections.push(html);
                }
            } else if let Some(article) = current.as_mut() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let (line, targets) = self.wikilinks.transform_line(line);
                let (line, links) = self.external.transform_line(&line);

                for target in targets {
                    if !out.outgoing_links.contains(&target) {
                        out.outgoing_links.push(target);
                    }
                }
                out.external_links.extend(links);
                article.sections.push(line);
            }
        }

        if let Some(article) = current {
            out.articles.push(article);
        }

        out
    }
}

fn heading_entry(heading: &str, level: u8) -> (TocEntry, String) {
    let text = heading.trim().to_string();
    let anchor = heading_anchor(&text);
    let html = format!(r#"<h{level} id="{anchor}">{text}</h{level}>"#);
    (
        TocEntry {
            text,
            anchor,
            level,
        },
        html,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(text: &str) -> Segmented {
        let resolver = LinkResolver::empty("articles");
        Segmenter::new(&resolver).segment(text)
    }

    #[test]
    fn test_articles_split_at_level_two() {
        let out = segment("preamble\n## First\none\n\ntwo\n## Second\nthree");

        assert_eq!(out.articles.len(), 2);
        assert_eq!(out.articles[0].header, r#"<h2 id="first">First</h2>"#);
        assert_eq!(out.articles[0].sections, vec!["one", "two"]);
        assert_eq!(out.articles[1].sections, vec!["three"]);
    }

    #[test]
    fn test_toc_levels_and_anchors() {
        let out = segment("## Getting Started\n### Install Steps\ntext\n## Getting Started");

        let toc: Vec<(&str, &str, u8)> = out
            .toc
            .iter()
            .map(|e| (e.text.as_str(), e.anchor.as_str(), e.level))
            .collect();
        assert_eq!(
            toc,
            vec![
                ("Getting Started", "getting-started", 2),
                ("Install Steps", "install-steps", 3),
                ("Getting Started", "getting-started", 2),
            ]
        );
        assert_eq!(
            out.articles[0].sections[0],
            r#"<h3 id="install-steps">Install Steps</h3>"#
        );
    }

    #[test]
    fn test_orphan_level_three_heading() {
        let out = segment("### Lonely\ntext");

        assert!(out.articles.is_empty());
        assert_eq!(out.toc.len(), 1);
    }

    #[test]
    fn test_links_resolved_in_article_lines() {
        let out = segment("## A\n[[Target Page]] then [[target page|again]] and [x](http://x.org)");

        assert_eq!(out.outgoing_links, vec!["target-page"]);
        assert_eq!(out.external_links.len(), 1);
        assert!(out.articles[0].sections[0].contains(r#"target="_blank""#));
    }

    #[test]
    fn test_links_before_first_heading_are_ignored() {
        let out = segment("[[Early]]\n## A\ntext");
        assert!(out.outgoing_links.is_empty());
    }
}
