//! Line-numbered display of tokenized text.
//!
//! Rendering is a pure projection: it numbers lines and attaches styles, and
//! never changes span text.

use std::fmt::Write;

use crossterm::style::{self as term, Stylize};
use ratatui::style::{Color, Modifier, Style};

use super::{Line, Span, SpanClass};

/// One display line: its 1-based number and its spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub number: usize,
    pub spans: Vec<Span>,
}

/// Numbers tokenized lines from 1, preserving order.
pub fn render(lines: impl IntoIterator<Item = Line>) -> Vec<RenderedLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, spans)| RenderedLine {
            number: i + 1,
            spans,
        })
        .collect()
}

/// Width of the line-number gutter: enough digits for the last line, at least 3.
pub fn gutter_width(lines: &[RenderedLine]) -> usize {
    let last = lines.last().map_or(1, |l| l.number);
    last.to_string().len().max(3)
}

impl RenderedLine {
    /// The source text of the line.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Unstyled output: `  12 │ code`.
    pub fn to_plain(&self, width: usize) -> String {
        format!("{:>width$} │ {}", self.number, self.text())
    }

    /// Output styled with ANSI escapes for a terminal.
    pub fn to_ansi(&self, width: usize) -> String {
        let mut out = format!(
            "{} ",
            term::style(format!("{:>width$} │", self.number)).with(term::Color::DarkGrey)
        );
        for span in &self.spans {
            let text = term::style(span.text.as_str());
            // Writing to a String cannot fail.
            let _ = match class_paint(span.class) {
                Paint::Plain => write!(out, "{}", span.text),
                Paint::Keyword => write!(out, "{}", text.with(term::Color::Blue).bold()),
                Paint::Tag => write!(out, "{}", text.with(term::Color::Blue)),
                Paint::Literal => write!(out, "{}", text.with(term::Color::Green)),
                Paint::Accent => write!(out, "{}", text.with(term::Color::Cyan)),
                Paint::Attribute => write!(out, "{}", text.with(term::Color::Magenta)),
                Paint::Muted => write!(out, "{}", text.with(term::Color::DarkGrey).italic()),
            };
        }
        out
    }

    /// A `ratatui` line with a gutter and styled spans.
    pub fn to_line(&self, width: usize) -> ratatui::text::Line<'static> {
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        spans.push(ratatui::text::Span::styled(
            format!("{:>width$} │ ", self.number),
            Style::default().fg(Color::DarkGray),
        ));
        spans.extend(
            self.spans
                .iter()
                .map(|s| ratatui::text::Span::styled(s.text.clone(), class_style(s.class))),
        );
        ratatui::text::Line::from(spans)
    }
}

/// Display style for a span class.
fn class_style(class: SpanClass) -> Style {
    match class_paint(class) {
        Paint::Plain => Style::default(),
        Paint::Keyword => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        Paint::Tag => Style::default().fg(Color::Blue),
        Paint::Literal => Style::default().fg(Color::Green),
        Paint::Accent => Style::default().fg(Color::Cyan),
        Paint::Attribute => Style::default().fg(Color::Magenta),
        Paint::Muted => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Shared palette, so terminal and TUI output agree.
enum Paint {
    Plain,
    Keyword,
    Tag,
    Literal,
    Accent,
    Attribute,
    Muted,
}

fn class_paint(class: SpanClass) -> Paint {
    match class {
        SpanClass::Plain => Paint::Plain,
        SpanClass::Keyword => Paint::Keyword,
        SpanClass::Tag => Paint::Tag,
        SpanClass::String | SpanClass::AttributeValue => Paint::Literal,
        SpanClass::Number | SpanClass::Call => Paint::Accent,
        SpanClass::AttributeName => Paint::Attribute,
        SpanClass::Comment => Paint::Muted,
    }
}
