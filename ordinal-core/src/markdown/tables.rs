//! GitHub-style pipe tables.

use super::Transformer;
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("table separator pattern")
});

/// Converts a header row, separator row and following rows into one HTML line
///
/// The header fixes the column count. Body rows are consumed while they have
/// exactly that many cells; the first ragged row ends the table and is left
/// as it was written.
#[derive(Debug, Default)]
pub struct TableTransformer;

impl TableTransformer {
    pub fn new() -> Self {
        Self
    }
}

fn is_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn render_row(cells: &[String], tag: &str) -> String {
    let mut html = String::from("<tr>");
    for cell in cells {
        html.push_str(&format!("<{tag}>{cell}</{tag}>"));
    }
    html.push_str("</tr>");
    html
}

impl Transformer for TableTransformer {
    fn name(&self) -> &'static str {
        "tables"
    }

    fn transform(&self, text: &str) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            let separator = lines.get(i + 1).copied().unwrap_or("");

            let header = split_row(line);
            let is_table = is_row(line)
                && SEPARATOR.is_match(separator)
                && split_row(separator).len() == header.len();

            if !is_table {
                out.push(line.to_string());
                i += 1;
                continue;
            }

            let mut html = String::from("<table><thead>");
            html.push_str(&render_row(&header, "th"));
            html.push_str("</thead><tbody>");

            i += 2;
            while i < lines.len() && is_row(lines[i]) {
                let cells = split_row(lines[i]);
                if cells.len() != header.len() {
                    break;
                }
                html.push_str(&render_row(&cells, "td"));
                i += 1;
            }

            html.push_str("</tbody></table>");
            out.push(html);
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_table() {
        let out = TableTransformer::new().transform("|A|B|\n|-|-|\n|1|2|");
        assert_eq!(
            out,
            "<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_alignment_markers_and_padding() {
        let out = TableTransformer::new().transform("| Name | Age |\n| :--- | ---: |\n| Ada | 36 |\nafter");
        assert!(out.starts_with("<table><thead><tr><th>Name</th><th>Age</th>"));
        assert!(out.contains("<td>Ada</td><td>36</td>"));
        assert!(out.ends_with("\nafter"));
    }

    #[test]
    fn test_ragged_row_passes_through() {
        let out = TableTransformer::new().transform("|A|B|\n|-|-|\n|1|2|\n|only|\n|3|4|");
        let lines: Vec<&str> = out.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("<td>1</td>"));
        assert_eq!(lines[1], "|only|");
        assert_eq!(lines[2], "|3|4|");
    }

    #[test]
    fn test_pipe_line_without_separator_is_text() {
        let text = "|not a table|\nplain";
        assert_eq!(TableTransformer::new().transform(text), text);
    }
}
