//! `.toc` manifest tokenizer.
//!
//! Metadata lines look like `## Key: Value`. Everything else (file lists,
//! blank lines) is plain text.

use super::{Line, SpanClass, push};

const MARKER: &str = "##";

pub(super) fn tokenize_line(line: &str) -> Line {
    let mut spans = Vec::new();

    let indent = line.len() - line.trim_start().len();
    if !line[indent..].starts_with(MARKER) {
        push(&mut spans, line, SpanClass::Plain);
        return spans;
    }

    let after_marker = indent + MARKER.len();
    let Some(colon) = line[after_marker..].find(':').map(|i| after_marker + i) else {
        push(&mut spans, line, SpanClass::Comment);
        return spans;
    };

    let gap = line[after_marker..colon].len() - line[after_marker..colon].trim_start().len();
    let key_start = after_marker + gap;

    push(&mut spans, &line[..key_start], SpanClass::Comment);
    push(&mut spans, &line[key_start..colon], SpanClass::AttributeName);
    push(&mut spans, ":", SpanClass::Comment);
    push(&mut spans, &line[colon + 1..], SpanClass::Plain);
    spans
}

#[cfg(test)]
mod tests {
    use super::super::Span;
    use super::*;

    #[test]
    fn metadata_line() {
        assert_eq!(
            tokenize_line("## Interface: 110002"),
            vec![
                Span::new("## ", SpanClass::Comment),
                Span::new("Interface", SpanClass::AttributeName),
                Span::new(":", SpanClass::Comment),
                Span::new(" 110002", SpanClass::Plain),
            ]
        );
    }

    #[test]
    fn splits_at_first_colon_only() {
        let spans = tokenize_line("## Notes: see http://x");
        assert_eq!(spans[1].text, "Notes");
        assert_eq!(spans[3].text, " see http://x");
    }

    #[test]
    fn marker_without_colon_is_muted() {
        assert_eq!(
            tokenize_line("  ## just a note"),
            vec![Span::new("  ## just a note", SpanClass::Comment)]
        );
    }

    #[test]
    fn empty_value_and_indented_marker() {
        assert_eq!(
            tokenize_line("\t##Title:"),
            vec![
                Span::new("\t##", SpanClass::Comment),
                Span::new("Title", SpanClass::AttributeName),
                Span::new(":", SpanClass::Comment),
            ]
        );
    }

    #[test]
    fn file_list_lines_are_plain() {
        assert_eq!(
            tokenize_line("Core.lua"),
            vec![Span::new("Core.lua", SpanClass::Plain)]
        );
        assert!(tokenize_line("").is_empty());
    }
}
