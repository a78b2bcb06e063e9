//! Numeric footnotes: `[^1]` references and `[^1]: text` definitions.

use super::Transformer;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static DEFINITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\[\^(\d+)\]: (.+)$\n?").expect("footnote definition pattern"));

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^(\d+)\]").expect("footnote reference pattern"));

/// Collect `[^n]: text` definitions; a later definition of the same id wins
pub fn collect_definitions(text: &str) -> BTreeMap<String, String> {
    let mut footnotes = BTreeMap::new();
    for caps in DEFINITION.captures_iter(text) {
        footnotes.insert(caps[1].to_string(), caps[2].trim_end().to_string());
    }
    footnotes
}

/// Strips definition lines and links every reference to `#footnote-n`
///
/// References are linked whether or not a definition exists.
#[derive(Debug, Default)]
pub struct FootnoteTransformer;

impl FootnoteTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for FootnoteTransformer {
    fn name(&self) -> &'static str {
        "footnotes"
    }

    fn transform(&self, text: &str) -> String {
        let stripped = DEFINITION.replace_all(text, "");
        REFERENCE
            .replace_all(&stripped, |caps: &regex::Captures| {
                let id = &caps[1];
                format!(
                    r##"<a href="#footnote-{id}" id="ref-{id}" class="footnote-ref">[{id}]</a>"##
                )
            })
            .trim_end()
            .to_string()
    }
}
