//! Frame projection: engine state plus screen state in, drawable view out.

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, Tabs, Wrap},
};

use crate::highlight::{self, gutter_width};
use crate::model::Role;
use crate::notes;
use crate::workflow::{Engine, Session};

use super::review::{Mode, ReviewScreen};

/// Why a frame could not be projected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderFault {
    #[error("selected file {index} is out of range ({count} files)")]
    FileOutOfRange { index: usize, count: usize },
}

/// Everything one frame draws. Owns its text, so it outlives no borrows.
pub struct View {
    header: Line<'static>,
    tabs: Vec<String>,
    selected: usize,
    code_title: String,
    code: Vec<Line<'static>>,
    scroll: u16,
    side: Vec<Line<'static>>,
    side_scroll: u16,
    status: Line<'static>,
    footer: Line<'static>,
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn strong() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Builds the view for the current state.
pub fn project(engine: &Engine, screen: &ReviewScreen) -> Result<View, RenderFault> {
    let session = engine.session();
    let count = session.files.len();
    let selected = screen.selected();

    let (code_title, code) = if count == 0 {
        (
            "No files".to_string(),
            vec![Line::styled("This project has no files.", muted())],
        )
    } else {
        let file = session
            .files
            .get(selected)
            .ok_or(RenderFault::FileOutOfRange {
                index: selected,
                count,
            })?;
        let lines = highlight::highlight_file(file);
        let width = gutter_width(&lines);
        (
            format!("{} ({})", file.filename, file.label()),
            lines.iter().map(|l| l.to_line(width)).collect(),
        )
    };

    Ok(View {
        header: header(engine),
        tabs: session.files.iter().map(|f| f.filename.clone()).collect(),
        selected,
        code_title,
        code,
        scroll: screen.scroll(),
        side: side_panel(session),
        side_scroll: screen.side_scroll(),
        status: status_line(engine, screen),
        footer: footer(screen),
    })
}

fn header(engine: &Engine) -> Line<'static> {
    let session = engine.session();
    let mut spans = vec![
        Span::styled("Forge", strong()),
        Span::styled("  ·  ", muted()),
        Span::styled(session.addon_name.clone(), Style::default().fg(Color::Cyan)),
        Span::styled(format!("  [{}]", session.addon_type.label()), muted()),
        Span::styled(format!("  iteration {}", session.iteration_count), muted()),
        Span::styled(format!("  {}", engine.phase()), muted()),
    ];
    if session.demo {
        spans.push(Span::styled("  demo", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::styled(title.to_string(), strong()));
}

fn side_panel(session: &Session) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let summary = if session.generation_summary.is_empty() {
        &session.spec_summary
    } else {
        &session.generation_summary
    };
    if !summary.is_empty() {
        section(&mut lines, "Summary");
        lines.extend(notes::to_lines(summary));
    }

    if !session.file_tree.is_empty() {
        section(&mut lines, "File tree");
        lines.extend(
            session
                .file_tree
                .lines()
                .map(|l| Line::styled(l.to_string(), muted())),
        );
    }

    if let Some(receipt) = &session.delivery {
        section(&mut lines, "Delivered");
        lines.push(Line::from(receipt.message.clone()));
        for url in [&receipt.repository_url, &receipt.gist_url] {
            if !url.is_empty() {
                lines.push(Line::styled(url.clone(), Style::default().fg(Color::Cyan)));
            }
        }
    }

    if let Some(receipt) = &session.package {
        section(&mut lines, "Packaged");
        lines.push(Line::from(receipt.message.clone()));
        lines.push(Line::from(format!("{} → {}", receipt.package_name, receipt.installation_path)));
        if !receipt.download_url.is_empty() {
            lines.push(Line::styled(
                receipt.download_url.clone(),
                Style::default().fg(Color::Cyan),
            ));
        }
    }

    section(&mut lines, "Conversation");
    if session.feedback.is_empty() {
        lines.push(Line::styled("Press f to send feedback.", muted()));
    }
    for entry in &session.feedback {
        let (who, color) = match entry.role {
            Role::User => ("You", Color::Green),
            Role::Agent => ("Agent", Color::Magenta),
        };
        lines.push(Line::styled(
            who,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        lines.extend(notes::to_lines(&entry.message));
    }

    lines
}

fn status_line(engine: &Engine, screen: &ReviewScreen) -> Line<'static> {
    let state = engine.state();
    if engine.phase().is_busy() {
        return Line::styled(
            format!(" ⟳ {}", state.status_message),
            Style::default().fg(Color::Yellow),
        );
    }
    if !state.error_message.is_empty() {
        return Line::from(vec![
            Span::styled(format!(" ✗ {}", state.error_message), Style::default().fg(Color::Red)),
            Span::styled("  (x to dismiss)", muted()),
        ]);
    }
    if let Some(notice) = screen.notice() {
        return Line::styled(format!(" ! {notice}"), Style::default().fg(Color::Yellow));
    }
    if !state.status_message.is_empty() {
        return Line::styled(
            format!(" ✓ {}", state.status_message),
            Style::default().fg(Color::Green),
        );
    }
    Line::default()
}

fn footer(screen: &ReviewScreen) -> Line<'static> {
    match screen.mode() {
        Mode::Compose { kind, input } => Line::from(vec![
            Span::styled(format!(" {} › ", kind.label()), strong()),
            Span::styled(input.clone(), Style::default().fg(Color::White)),
            Span::styled("█", muted()),
            Span::styled("   ⏎ send  esc cancel", muted()),
        ]),
        Mode::Browse => Line::styled(
            " ⇥ file  ↑↓ scroll  J/K notes  f feedback  p package  d deliver  q quit",
            muted(),
        ),
    }
}

impl View {
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // header
            Constraint::Length(1), // tabs
            Constraint::Min(0),    // content
            Constraint::Length(1), // status
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

        let header =
            Paragraph::new(self.header.clone()).block(Block::default().padding(Padding::new(1, 0, 0, 1)));
        frame.render_widget(header, chunks[0]);

        let tabs = Tabs::new(self.tabs.clone())
            .select(self.selected)
            .style(muted())
            .highlight_style(strong().add_modifier(Modifier::UNDERLINED));
        frame.render_widget(tabs, chunks[1]);

        let content =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(chunks[2]);

        let code = Paragraph::new(self.code.clone())
            .scroll((self.scroll, 0))
            .block(Block::bordered().title(self.code_title.clone()).border_style(muted()));
        frame.render_widget(code, content[0]);

        let side = Paragraph::new(self.side.clone())
            .wrap(Wrap { trim: false })
            .scroll((self.side_scroll, 0))
            .block(Block::bordered().border_style(muted()).padding(Padding::horizontal(1)));
        frame.render_widget(side, content[1]);

        frame.render_widget(Paragraph::new(self.status.clone()), chunks[3]);
        frame.render_widget(Paragraph::new(self.footer.clone()), chunks[4]);
    }
}

/// The fallback drawn when projection fails.
pub fn render_fault(frame: &mut Frame, fault: &RenderFault) {
    let lines = vec![
        Line::styled("Something went wrong drawing this screen.", strong()),
        Line::default(),
        Line::styled(fault.to_string(), Style::default().fg(Color::Red)),
        Line::default(),
        Line::styled("r reset view  q quit", muted()),
    ];
    let fallback = Paragraph::new(lines).block(Block::default().padding(Padding::new(2, 2, 1, 0)));
    frame.render_widget(fallback, frame.area());
}
