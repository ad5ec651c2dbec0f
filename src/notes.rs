//! Renderer for the notes dialect used by summaries and agent replies.
//!
//! A deliberately small subset of markdown, handled one line at a time:
//!
//! - `#`, `##`, `###` headings
//! - `-` / `*` bullets and `1.` ordered items
//! - `**bold**` runs inside a line
//! - blank lines as spacing
//!
//! There is no nesting and emphasis never spans lines.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// A run of inline text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

/// One display block, produced from exactly one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(Vec<Inline>),
    /// An ordered item; `marker` is the number as written.
    Numbered { marker: String, inlines: Vec<Inline> },
    Paragraph(Vec<Inline>),
    Spacer,
}

/// Renders notes text into blocks. Empty text yields no blocks.
pub fn render(text: &str) -> Vec<Block> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(render_line).collect()
}

fn render_line(line: &str) -> Block {
    for (prefix, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                text: rest.to_string(),
            };
        }
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::Bullet(inlines(rest));
    }
    if let Some((marker, rest)) = ordered_item(line) {
        return Block::Numbered {
            marker: marker.to_string(),
            inlines: inlines(rest),
        };
    }
    if line.trim().is_empty() {
        return Block::Spacer;
    }
    Block::Paragraph(inlines(line))
}

/// Splits `12. rest` into `("12", "rest")`.
fn ordered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let after = line[digits..].strip_prefix('.')?;
    let ws = after.chars().next().filter(|c| c.is_whitespace())?;
    Some((&line[..digits], &after[ws.len_utf8()..]))
}

/// Splits a line into text and `**bold**` runs.
///
/// Pairs are matched left to right, shortest first; an unclosed `**` is literal.
fn inlines(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        if open > 0 {
            out.push(Inline::Text(rest[..open].to_string()));
        }
        out.push(Inline::Bold(after_open[..close].to_string()));
        rest = &after_open[close + 2..];
    }
    if !rest.is_empty() || out.is_empty() {
        out.push(Inline::Text(rest.to_string()));
    }
    out
}

impl Block {
    /// Plain-text form for non-terminal output.
    pub fn to_plain(&self) -> String {
        match self {
            Self::Heading { text, .. } => text.clone(),
            Self::Bullet(inlines) => format!("• {}", flatten(inlines)),
            Self::Numbered { marker, inlines } => format!("{marker}. {}", flatten(inlines)),
            Self::Paragraph(inlines) => flatten(inlines),
            Self::Spacer => String::new(),
        }
    }

    /// Styled `ratatui` line.
    pub fn to_line(&self) -> Line<'static> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        match self {
            Self::Heading { level, text } => {
                let style = if *level == 1 {
                    bold.add_modifier(Modifier::UNDERLINED)
                } else {
                    bold
                };
                Line::from(Span::styled(text.clone(), style))
            }
            Self::Bullet(inlines) => prefixed("  • ".to_string(), inlines),
            Self::Numbered { marker, inlines } => prefixed(format!("  {marker}. "), inlines),
            Self::Paragraph(inlines) => prefixed(String::new(), inlines),
            Self::Spacer => Line::default(),
        }
    }
}

/// Renders notes text straight to `ratatui` lines.
pub fn to_lines(text: &str) -> Vec<Line<'static>> {
    render(text).iter().map(Block::to_line).collect()
}

/// Renders notes text to plain lines joined by newlines.
pub fn to_plain(text: &str) -> String {
    render(text)
        .iter()
        .map(Block::to_plain)
        .collect::<Vec<_>>()
        .join("\n")
}

fn flatten(inlines: &[Inline]) -> String {
    inlines
        .iter()
        .map(|i| match i {
            Inline::Text(t) | Inline::Bold(t) => t.as_str(),
        })
        .collect()
}

fn prefixed(prefix: String, inlines: &[Inline]) -> Line<'static> {
    let mut spans = Vec::with_capacity(inlines.len() + 1);
    if !prefix.is_empty() {
        spans.push(Span::raw(prefix));
    }
    for inline in inlines {
        spans.push(match inline {
            Inline::Text(t) => Span::raw(t.clone()),
            Inline::Bold(t) => {
                Span::styled(t.clone(), Style::default().add_modifier(Modifier::BOLD))
            }
        });
    }
    Line::from(spans)
}
