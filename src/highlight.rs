//! Syntax highlighting for addon files.
//!
//! Each file type has a line-oriented tokenizer that turns text into classified
//! spans. The tokenizers are best-effort: they never fail, and the spans of a
//! line always concatenate back to the exact source line.
//!
//! ```text
//! tokenize(text, format) -> Vec<Line>     (script | markup | manifest | plain)
//! render(lines)          -> Vec<RenderedLine>
//! ```

mod manifest;
mod markup;
mod render;
mod scan;
mod script;

use crate::model::{AddonFile, FileType};

pub use render::{RenderedLine, gutter_width, render};

/// How a span should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanClass {
    Keyword,
    String,
    Number,
    /// An identifier directly followed by `(`.
    Call,
    Comment,
    Tag,
    AttributeName,
    AttributeValue,
    Plain,
}

/// A classified run of text within one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub class: SpanClass,
}

impl Span {
    pub fn new(text: impl Into<String>, class: SpanClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// The spans of one source line, in order.
pub type Line = Vec<Span>;

/// Which tokenizer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Script,
    Markup,
    Manifest,
    Plain,
}

impl From<FileType> for Format {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Script => Self::Script,
            FileType::Markup => Self::Markup,
            FileType::Manifest => Self::Manifest,
            FileType::Other => Self::Plain,
        }
    }
}

/// Tokenizes `text` line by line.
///
/// Always yields at least one line; empty text is one empty line.
pub fn tokenize(text: &str, format: Format) -> Vec<Line> {
    text.split('\n')
        .map(|line| match format {
            Format::Script => script::tokenize_line(line),
            Format::Markup => markup::tokenize_line(line),
            Format::Manifest => manifest::tokenize_line(line),
            Format::Plain => plain_line(line),
        })
        .collect()
}

/// Tokenizes and renders a file with the tokenizer for its type.
pub fn highlight_file(file: &AddonFile) -> Vec<RenderedLine> {
    render(tokenize(&file.content, file.file_type.into()))
}

fn plain_line(line: &str) -> Line {
    let mut spans = Vec::new();
    push(&mut spans, line, SpanClass::Plain);
    spans
}

/// Appends a span, dropping empty text.
fn push(spans: &mut Line, text: &str, class: SpanClass) {
    if !text.is_empty() {
        spans.push(Span::new(text, class));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS: [Format; 4] = [
        Format::Script,
        Format::Markup,
        Format::Manifest,
        Format::Plain,
    ];

    fn joined(line: &Line) -> String {
        line.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        for format in FORMATS {
            let lines = tokenize("", format);
            assert_eq!(lines.len(), 1, "{format:?}");
            assert!(lines[0].is_empty(), "{format:?}");
        }
    }

    #[test]
    fn spans_reproduce_source_lines() {
        let inputs = [
            "local x = CreateFrame(\"Frame\", nil, UIParent) -- make it",
            "  if t['k'] ~= 3.25 then print (x) end\t",
            "<Frame name=\"Bar\" virtual=\"true\"><!-- c --></Frame>",
            "<Anchor point=\"LEFT\" x=\"4\"/> trailing < text",
            "## Title: Foo: Bar",
            "   ## Notes",
            "Core.lua",
            "unterminated \"quote and 'other",
            "ünïcödé → ✓ <Ü a=\"ß\">",
            "\r",
        ];
        for input in inputs {
            for format in FORMATS {
                let lines = tokenize(input, format);
                assert_eq!(lines.len(), 1);
                assert_eq!(joined(&lines[0]), input, "{format:?}: {input}");
                assert!(lines[0].iter().all(|s| !s.text.is_empty()));
            }
        }
    }

    #[test]
    fn line_count_follows_newlines() {
        let lines = tokenize("a\n\nb\n", Format::Script);
        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_empty());
        assert!(lines[3].is_empty());
    }

    #[test]
    fn manifest_scenario() {
        let lines = tokenize("## Title: Foo\nPlain line", Format::Manifest);

        assert_eq!(lines.len(), 2);
        let texts: Vec<&str> = lines[0].iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["## ", "Title", ":", " Foo"]);
        assert_eq!(lines[0][1].class, SpanClass::AttributeName);
        assert_eq!(lines[1], vec![Span::new("Plain line", SpanClass::Plain)]);
    }

    #[test]
    fn plain_format_never_classifies() {
        let lines = tokenize("local function f() end", Format::Plain);
        assert_eq!(
            lines[0],
            vec![Span::new("local function f() end", SpanClass::Plain)]
        );
    }

    #[test]
    fn highlight_file_uses_file_type() {
        let file = AddonFile::new("Core.lua", "-- header\nlocal x");
        let rendered = highlight_file(&file);

        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].spans[0].class, SpanClass::Comment);
        assert_eq!(rendered[1].spans[0].class, SpanClass::Keyword);
    }
}
