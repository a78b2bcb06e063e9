//! Bold (`**text**`) and italics (`_text_`).
//!
//! Both passes share one delimiter scanner. A delimiter is a run of exactly
//! `width` marker characters; longer or shorter runs are literal text. HTML
//! tags, `[[wikilinks]]` and `](url)` targets are copied through untouched,
//! and a span never reaches across a line break or an element the same pass
//! emitted, which keeps both passes idempotent on their own output.

use super::Transformer;

struct Delimiter {
    marker: char,
    width: usize,
    tag: &'static str,
    /// Reject delimiters glued to letters or digits (`snake_case`)
    word_guard: bool,
}

impl Delimiter {
    fn apply(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        while i < chars.len() {
            if let Some(end) = literal_end(&chars, i) {
                out.extend(&chars[i..end]);
                i = end;
                continue;
            }

            if chars[i] != self.marker {
                out.push(chars[i]);
                i += 1;
                continue;
            }

            let run = run_len(&chars, i, self.marker);
            if run == self.width && self.opens(&chars, i) {
                if let Some(close) = self.find_close(&chars, i + run) {
                    out.push_str(&format!("<{}>", self.tag));
                    out.extend(&chars[i + run..close]);
                    out.push_str(&format!("</{}>", self.tag));
                    i = close + run;
                    continue;
                }
            }

            out.extend(&chars[i..i + run]);
            i += run;
        }

        out
    }

    fn opens(&self, chars: &[char], at: usize) -> bool {
        match chars.get(at + self.width) {
            Some(next) if !next.is_whitespace() => {}
            _ => return false,
        }
        let prev = at.checked_sub(1).map(|p| chars[p]);
        !(self.word_guard && prev.is_some_and(char::is_alphanumeric))
    }

    fn closes(&self, chars: &[char], at: usize) -> bool {
        if chars[at - 1].is_whitespace() {
            return false;
        }
        let next = chars.get(at + self.width);
        !(self.word_guard && next.is_some_and(|c| c.is_alphanumeric()))
    }

    fn find_close(&self, chars: &[char], start: usize) -> Option<usize> {
        let mut j = start;
        while j < chars.len() {
            let c = chars[j];
            if c == '\n' || self.is_own_tag(chars, j) {
                return None;
            }
            if let Some(end) = literal_end(chars, j) {
                j = end;
                continue;
            }
            if c == self.marker {
                let run = run_len(chars, j, self.marker);
                if run == self.width {
                    // The first real delimiter decides: close here or give up
                    return (j > start && self.closes(chars, j)).then_some(j);
                }
                j += run;
                continue;
            }
            j += 1;
        }
        None
    }

    fn is_own_tag(&self, chars: &[char], at: usize) -> bool {
        if chars[at] != '<' {
            return false;
        }
        let rest = chars.get(at + 1..).unwrap_or(&[]);
        let rest = rest.strip_prefix(&['/']).unwrap_or(rest);
        let tag: Vec<char> = self.tag.chars().collect();
        rest.starts_with(&tag) && matches!(rest.get(tag.len()), Some('>') | Some(' '))
    }
}

fn run_len(chars: &[char], at: usize, marker: char) -> usize {
    chars[at..].iter().take_while(|&&c| c == marker).count()
}

/// End (exclusive) of a region starting at `at` that must not be rewritten
fn literal_end(chars: &[char], at: usize) -> Option<usize> {
    match chars[at] {
        '<' => {
            let next = *chars.get(at + 1)?;
            if !(next.is_ascii_alphabetic() || next == '/' || next == '!') {
                return None;
            }
            find_from(chars, at + 1, &['>'], false).map(|end| end + 1)
        }
        '[' if chars.get(at + 1) == Some(&'[') => {
            find_from(chars, at + 2, &[']', ']'], true).map(|end| end + 2)
        }
        ']' if chars.get(at + 1) == Some(&'(') => {
            find_from(chars, at + 2, &[')'], true).map(|end| end + 1)
        }
        _ => None,
    }
}

fn find_from(chars: &[char], from: usize, needle: &[char], same_line: bool) -> Option<usize> {
    let mut j = from;
    while j + needle.len() <= chars.len() {
        if same_line && chars[j] == '\n' {
            return None;
        }
        if chars[j..].starts_with(needle) {
            return Some(j);
        }
        j += 1;
    }
    None
}

/// `**text**` to `<strong>text</strong>`
pub struct BoldTransformer {
    delimiter: Delimiter,
}

impl BoldTransformer {
    pub fn new() -> Self {
        Self {
            delimiter: Delimiter {
                marker: '*',
                width: 2,
                tag: "strong",
                word_guard: false,
            },
        }
    }
}

impl Default for BoldTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for BoldTransformer {
    fn name(&self) -> &'static str {
        "bold"
    }

    fn transform(&self, text: &str) -> String {
        self.delimiter.apply(text)
    }
}

/// `_text_` to `<em>text</em>`, guarded at word boundaries
pub struct ItalicTransformer {
    delimiter: Delimiter,
}

impl ItalicTransformer {
    pub fn new() -> Self {
        Self {
            delimiter: Delimiter {
                marker: '_',
                width: 1,
                tag: "em",
                word_guard: true,
            },
        }
    }
}

impl Default for ItalicTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for ItalicTransformer {
    fn name(&self) -> &'static str {
        "italics"
    }

    fn transform(&self, text: &str) -> String {
        self.delimiter.apply(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(text: &str) -> String {
        BoldTransformer::new().transform(text)
    }

    fn italic(text: &str) -> String {
        ItalicTransformer::new().transform(text)
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold("a **strong** word"), "a <strong>strong</strong> word");
        assert_eq!(bold("**x** and **y**"), "<strong>x</strong> and <strong>y</strong>");
    }

    #[test]
    fn test_bold_needs_tight_delimiters() {
        assert_eq!(bold("** loose **"), "** loose **");
        assert_eq!(bold("2 ** 3"), "2 ** 3");
        assert_eq!(bold("***three***"), "***three***");
    }

    #[test]
    fn test_bold_does_not_span_lines() {
        assert_eq!(bold("**open\nclose**"), "**open\nclose**");
    }

    #[test]
    fn test_italics() {
        assert_eq!(italic("an _emphasised_ word"), "an <em>emphasised</em> word");
        assert_eq!(italic("(_aside_)"), "(<em>aside</em>)");
    }

    #[test]
    fn test_italics_word_guard() {
        assert_eq!(italic("snake_case_name"), "snake_case_name");
        assert_eq!(italic("_snake_case_"), "_snake_case_");
    }

    #[test]
    fn test_markup_targets_are_untouched() {
        let text = r#"[[some_page_name]] <a href="/a_b_c">x</a> [doc](https://x.com/_a_)"#;
        assert_eq!(italic(text), text);
    }

    #[test]
    fn test_link_text_is_emphasised() {
        assert_eq!(
            italic("[_doc_](https://x.com)"),
            "[<em>doc</em>](https://x.com)"
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let inputs = [
            "**a **b** c**",
            "****X****",
            "**x** mid **y** tail**",
            "_a _b_ c_",
            "_one_ two_ _three_",
            "plain text with no markers",
        ];
        for input in inputs {
            let once = bold(input);
            assert_eq!(bold(&once), once, "bold not idempotent for {input:?}");
            let once = italic(input);
            assert_eq!(italic(&once), once, "italics not idempotent for {input:?}");
        }
    }
}
