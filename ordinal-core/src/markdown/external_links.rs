//! `[text](https://...)` links that open in a new browsing context.

use crate::models::ExternalLink;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EXTERNAL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\((https?://.*?)\)").expect("external link pattern"));

#[derive(Debug, Default)]
pub struct ExternalLinkTransformer;

impl ExternalLinkTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Rewrite external links in one line; must run after wikilinks
    pub fn transform_line(&self, line: &str) -> (String, Vec<ExternalLink>) {
        let mut links = Vec::new();

        let html = EXTERNAL_LINK.replace_all(line, |caps: &Captures| {
            let link = ExternalLink {
                text: caps[1].to_string(),
                url: caps[2].to_string(),
            };
            let anchor = format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                link.url, link.text
            );
            links.push(link);
            anchor
        });

        (html.into_owned(), links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_link() {
        let (html, links) =
            ExternalLinkTransformer::new().transform_line("Read [the book](https://doc.rust-lang.org/book/).");

        assert_eq!(
            html,
            r#"Read <a href="https://doc.rust-lang.org/book/" target="_blank" rel="noopener">the book</a>."#
        );
        assert_eq!(links[0].text, "the book");
    }

    #[test]
    fn test_relative_link_is_left_alone() {
        let line = "[local](/notes/a.html)";
        let (html, links) = ExternalLinkTransformer::new().transform_line(line);

        assert_eq!(html, line);
        assert!(links.is_empty());
    }
}
