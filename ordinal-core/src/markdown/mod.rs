//! Markup pipeline: ordered text passes followed by article segmentation.
//!
//! Only the constructs handled by a pass are rewritten; everything else in a
//! body is carried through literally.

pub mod emphasis;
pub mod external_links;
pub mod footnotes;
pub mod images;
pub mod quotes;
pub mod segment;
pub mod tables;
pub mod wikilinks;

use crate::models::{Article, ExternalLink, TocEntry};
use std::collections::BTreeMap;

pub use emphasis::{BoldTransformer, ItalicTransformer};
pub use external_links::ExternalLinkTransformer;
pub use footnotes::FootnoteTransformer;
pub use images::ImageTransformer;
pub use quotes::QuoteTransformer;
pub use segment::Segmenter;
pub use tables::TableTransformer;
pub use wikilinks::{LinkResolver, WikilinkTransformer};

/// A whole-body `text -> text` rewrite
pub trait Transformer {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn transform(&self, text: &str) -> String;
}

/// Output of [`MarkdownProcessor::convert`]
#[derive(Debug, Clone, Default)]
pub struct ConvertedBody {
    pub articles: Vec<Article>,
    pub toc: Vec<TocEntry>,
    pub footnotes: BTreeMap<String, String>,
    pub outgoing_links: Vec<String>,
    pub external_links: Vec<ExternalLink>,
}

/// Markdown processor running the fixed pass order
pub struct MarkdownProcessor {
    passes: Vec<Box<dyn Transformer>>,
}

impl MarkdownProcessor {
    /// Build the pipeline; image sources are rewritten under `images_url`
    pub fn new(images_url: &str) -> Self {
        Self {
            passes: vec![
                Box::new(FootnoteTransformer::new()),
                Box::new(QuoteTransformer::new()),
                Box::new(ImageTransformer::new(images_url)),
                Box::new(BoldTransformer::new()),
                Box::new(ItalicTransformer::new()),
                Box::new(TableTransformer::new()),
            ],
        }
    }

    /// Names of the whole-body passes in execution order
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every whole-body pass over `body`
    ///
    /// Returns the transformed text together with the footnote definitions
    /// that the footnote pass stripped out.
    pub fn transform(&self, body: &str) -> (String, BTreeMap<String, String>) {
        let footnotes = footnotes::collect_definitions(body);

        let text = self.passes.iter().fold(body.to_string(), |text, pass| {
            let out = pass.transform(&text);
            tracing::trace!(pass = pass.name(), "applied markup pass");
            out
        });

        (text, footnotes)
    }

    /// Transform a body and segment it into articles and a table of contents
    ///
    /// Wikilinks and external links are resolved line by line during
    /// segmentation; every wikilink target is reported in `outgoing_links`.
    pub fn convert(&self, body: &str, resolver: &LinkResolver) -> ConvertedBody {
        let (text, footnotes) = self.transform(body);
        let segmented = Segmenter::new(resolver).segment(&text);

        ConvertedBody {
            articles: segmented.articles,
            toc: segmented.toc,
            footnotes,
            outgoing_links: segmented.outgoing_links,
            external_links: segmented.external_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pass_order() {
        let processor = MarkdownProcessor::new("/images/");
        assert_eq!(
            processor.pass_names(),
            vec!["footnotes", "quotes", "images", "bold", "italics", "tables"]
        );
    }

    #[test]
    fn test_convert_full_body() {
        let resolver = LinkResolver::empty("articles");
        let processor = MarkdownProcessor::new("/images/");
        let body = "intro is dropped\n\n## Overview\n\nSee [[Memory Model]] and **this**[^1].\n> quoted\n### Details\n[docs](https://example.com)\n[^1]: A note.\n";

        let converted = processor.convert(body, &resolver);

        assert_eq!(converted.articles.len(), 1);
        let article = &converted.articles[0];
        assert_eq!(article.header, r#"<h2 id="overview">Overview</h2>"#);
        assert_eq!(
            article.sections,
            vec![
                r##"See <a href="/articles/memory-model.html">Memory Model</a> and <strong>this</strong><a href="#footnote-1" id="ref-1" class="footnote-ref">[1]</a>."##.to_string(),
                "<blockquote>quoted</blockquote>".to_string(),
                r#"<h3 id="details">Details</h3>"#.to_string(),
                r#"<a href="https://example.com" target="_blank" rel="noopener">docs</a>"#.to_string(),
            ]
        );
        assert_eq!(converted.toc.len(), 2);
        assert_eq!(converted.outgoing_links, vec!["memory-model"]);
        assert_eq!(converted.footnotes.get("1").map(String::as_str), Some("A note."));
        assert_eq!(converted.external_links[0].url, "https://example.com");
    }
}
