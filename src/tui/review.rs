//! Review screen state and input handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const PAGE: u16 = 20;

/// What the user is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Compose { kind: ComposeKind, input: String },
}

/// Which stage the text being typed is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeKind {
    Feedback,
    Repository,
}

impl ComposeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Feedback => "Feedback",
            Self::Repository => "Repository",
        }
    }
}

/// What a key press asks the app to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    ClearError,
    Refine(String),
    Deliver(String),
    Package,
}

pub struct ReviewScreen {
    selected: usize,
    scroll: u16,
    side_scroll: u16,
    mode: Mode,
    notice: Option<String>,
}

impl ReviewScreen {
    pub fn new() -> Self {
        Self {
            selected: 0,
            scroll: 0,
            side_scroll: 0,
            mode: Mode::Browse,
            notice: None,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn side_scroll(&self) -> u16 {
        self.side_scroll
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// A message from the screen itself, such as a refused stage.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Back to the first file, top of the page, browsing.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Keeps the selection valid after the file set changed.
    pub fn sync(&mut self, file_count: usize) {
        if self.selected >= file_count {
            self.selected = 0;
            self.scroll = 0;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, file_count: usize) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match &mut self.mode {
            Mode::Browse => self.on_browse_key(key, file_count),
            Mode::Compose { kind, input } => match key.code {
                KeyCode::Esc => {
                    self.mode = Mode::Browse;
                    Action::None
                }
                KeyCode::Enter => {
                    let text = input.trim().to_string();
                    if text.is_empty() {
                        return Action::None;
                    }
                    let action = match kind {
                        ComposeKind::Feedback => Action::Refine(text),
                        ComposeKind::Repository => Action::Deliver(text),
                    };
                    self.mode = Mode::Browse;
                    action
                }
                KeyCode::Backspace => {
                    input.pop();
                    Action::None
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    Action::None
                }
                _ => Action::None,
            },
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent, file_count: usize) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.next_file(file_count),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.prev_file(file_count),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char('J') => self.side_scroll = self.side_scroll.saturating_add(1),
            KeyCode::Char('K') => self.side_scroll = self.side_scroll.saturating_sub(1),
            KeyCode::Char('f') => self.compose(ComposeKind::Feedback),
            KeyCode::Char('d') => self.compose(ComposeKind::Repository),
            KeyCode::Char('p') => {
                self.notice = None;
                return Action::Package;
            }
            KeyCode::Char('x') => {
                self.notice = None;
                return Action::ClearError;
            }
            _ => {}
        }
        Action::None
    }

    fn compose(&mut self, kind: ComposeKind) {
        self.notice = None;
        self.mode = Mode::Compose {
            kind,
            input: String::new(),
        };
    }

    fn next_file(&mut self, file_count: usize) {
        if file_count > 0 {
            self.selected = (self.selected + 1) % file_count;
            self.scroll = 0;
        }
    }

    fn prev_file(&mut self, file_count: usize) {
        if file_count > 0 {
            self.selected = (self.selected + file_count - 1) % file_count;
            self.scroll = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(screen: &mut ReviewScreen, code: KeyCode) -> Action {
        screen.on_key(KeyEvent::new(code, KeyModifiers::NONE), 3)
    }

    fn type_str(screen: &mut ReviewScreen, s: &str) {
        for c in s.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn tabs_wrap_around() {
        let mut screen = ReviewScreen::new();

        press(&mut screen, KeyCode::BackTab);
        assert_eq!(screen.selected(), 2);

        press(&mut screen, KeyCode::Tab);
        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn switching_files_resets_scroll() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::PageDown);
        assert_eq!(screen.scroll(), PAGE);

        press(&mut screen, KeyCode::Tab);
        assert_eq!(screen.scroll(), 0);
    }

    #[test]
    fn feedback_compose_submits_trimmed_text() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::Char('f'));
        type_str(&mut screen, " add a button ");
        press(&mut screen, KeyCode::Backspace);

        let action = press(&mut screen, KeyCode::Enter);

        assert_eq!(action, Action::Refine("add a button".to_string()));
        assert_eq!(screen.mode(), &Mode::Browse);
    }

    #[test]
    fn compose_keys_are_text_not_commands() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::Char('d'));

        assert_eq!(press(&mut screen, KeyCode::Char('q')), Action::None);
        type_str(&mut screen, "/x");

        assert_eq!(
            press(&mut screen, KeyCode::Enter),
            Action::Deliver("q/x".to_string())
        );
    }

    #[test]
    fn empty_compose_stays_open() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::Char('f'));

        assert_eq!(press(&mut screen, KeyCode::Enter), Action::None);
        assert!(matches!(screen.mode(), Mode::Compose { .. }));

        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.mode(), &Mode::Browse);
    }

    #[test]
    fn sync_clamps_a_stale_selection() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Tab);

        screen.sync(1);

        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn ctrl_c_quits_while_composing() {
        let mut screen = ReviewScreen::new();
        press(&mut screen, KeyCode::Char('f'));

        let action = screen.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), 3);

        assert_eq!(action, Action::Quit);
    }
}
