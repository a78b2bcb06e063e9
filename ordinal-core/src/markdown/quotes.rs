//! `> ` blockquote lines and `- ` citation lines.

use super::Transformer;

/// Wraps quote lines one at a time; consecutive lines are not merged
#[derive(Debug, Default)]
pub struct QuoteTransformer;

impl QuoteTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for QuoteTransformer {
    fn name(&self) -> &'static str {
        "quotes"
    }

    fn transform(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| {
                if let Some(rest) = line.strip_prefix("> ") {
                    format!("<blockquote>{}</blockquote>", rest.trim())
                } else if let Some(rest) = line.strip_prefix("- ") {
                    format!("<cite>{}</cite>", rest.trim())
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
