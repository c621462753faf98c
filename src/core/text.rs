//! Source-text preprocessing shared by the classifier and the dependency
//! extractor.
//!
//! TeX line comments run from an unescaped `%` to the end of the line.
//! Both marker search and directive scanning operate on comment-stripped
//! text so that commented-out content is never acted on.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Remove line comments from TeX source. `\%` is an escaped percent sign
/// and stays part of the content; an unescaped `%` discards the rest of
/// the line.
pub fn strip_line_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());

    for line in source.lines() {
        let mut chars = line.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\\' => {
                    out.push(ch);
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '%' => break,
                _ => out.push(ch),
            }
        }
        out.push('\n');
    }

    out
}

/// Collapse every whitespace run to nothing, yielding a condensed form
/// suitable for token search regardless of line breaks or indentation.
pub fn condense_whitespace(source: &str) -> String {
    WHITESPACE.replace_all(source, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comment_to_end_of_line() {
        let stripped = strip_line_comments("text % comment\nmore");
        assert_eq!(stripped, "text \nmore\n");
    }

    #[test]
    fn keeps_escaped_percent() {
        let stripped = strip_line_comments("50\\% done % really\n");
        assert_eq!(stripped, "50\\% done \n");
    }

    #[test]
    fn escape_at_end_of_line_is_preserved() {
        let stripped = strip_line_comments("trailing\\");
        assert_eq!(stripped, "trailing\\\n");
    }

    #[test]
    fn condense_removes_all_whitespace() {
        assert_eq!(
            condense_whitespace("\\begin  {\n\tdocument }"),
            "\\begin{document}"
        );
    }
}
