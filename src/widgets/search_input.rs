//! Debounced one-line input used for the global search and for column
//! filters. Keystrokes recompute nothing by themselves; the new pattern is
//! released after a quiet period, or immediately on Enter.

use crate::utils::debouncer::Debouncer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

/// Result of handling a key while the input is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Keep editing; nothing to apply yet.
    Continue,
    /// Enter pressed: apply this pattern now and close the input.
    Submit(String),
    /// Esc pressed: close the input without applying.
    Cancel,
    /// The key is not ours (input inactive or Ctrl-C).
    PassThrough,
}

pub struct SearchInput {
    input: Input,
    debouncer: Debouncer,
    last_released: Option<String>,
    title: String,
    active: bool,
}

impl SearchInput {
    pub fn new(title: impl Into<String>, debounce_ms: u64) -> Self {
        Self {
            input: Input::default(),
            debouncer: Debouncer::new(debounce_ms),
            last_released: None,
            title: title.into(),
            active: false,
        }
    }

    /// Open the input seeded with the pattern currently in effect, so
    /// editing continues from it rather than starting blank.
    pub fn activate(&mut self, title: impl Into<String>, current: &str) {
        self.title = title.into();
        self.input = Input::default().with_value(current.to_string());
        self.debouncer.reset();
        self.last_released = Some(current.to_string());
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.debouncer.reset();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if !self.active {
            return InputAction::PassThrough;
        }

        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                InputAction::Cancel
            }
            KeyCode::Enter => {
                let pattern = self.input.value().to_string();
                self.deactivate();
                self.last_released = Some(pattern.clone());
                InputAction::Submit(pattern)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                InputAction::PassThrough
            }
            _ => {
                self.input.handle_event(&crossterm::event::Event::Key(key));
                let current = self.input.value().to_string();
                if self.last_released.as_ref() != Some(&current) {
                    self.debouncer.trigger();
                }
                InputAction::Continue
            }
        }
    }

    /// Poll from the event loop: the pattern to apply once the quiet
    /// period has elapsed, at most once per change.
    pub fn check_debounce(&mut self) -> Option<String> {
        if !self.debouncer.should_execute() {
            return None;
        }
        let pattern = self.input.value().to_string();
        if self.last_released.as_ref() == Some(&pattern) {
            return None;
        }
        self.last_released = Some(pattern.clone());
        Some(pattern)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let title = if self.debouncer.is_pending() {
            format!("{} (typing...)", self.title)
        } else {
            self.title.clone()
        };

        let style = Style::default().fg(Color::Yellow);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(style);

        let widget = Paragraph::new(self.input.value()).block(block).style(style);
        f.render_widget(widget, area);

        if self.active {
            f.set_cursor_position((area.x + self.input.cursor() as u16 + 1, area.y + 1));
        }
    }
}
