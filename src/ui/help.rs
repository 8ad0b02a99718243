//! Scrollable help overlay listing the key bindings for every mode.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// What the overlay wants the caller to do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpAction {
    None,
    Exit,
}

pub struct HelpOverlay {
    scroll_offset: u16,
    max_scroll: u16,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            max_scroll: 0,
        }
    }

    pub fn on_enter(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::F(1) => {
                HelpAction::Exit
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll);
                HelpAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                HelpAction::None
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
                HelpAction::None
            }
            KeyCode::PageUp | KeyCode::Char('b') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                HelpAction::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_offset = 0;
                HelpAction::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll_offset = self.max_scroll;
                HelpAction::None
            }
            _ => HelpAction::None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let lines = help_lines();
        let visible_height = area.height.saturating_sub(2) as usize;
        self.max_scroll = lines.len().saturating_sub(visible_height) as u16;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll);

        let title = if self.max_scroll > 0 {
            format!(
                " Help ({}/{}) - j/k scroll, Esc to close ",
                self.scroll_offset + 1,
                self.max_scroll + 1
            )
        } else {
            " Help - Esc to close ".to_string()
        };

        let paragraph = Paragraph::new(Text::from(lines))
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((self.scroll_offset, 0));
        f.render_widget(paragraph, area);
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(title).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from("Record Browser").style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        section("GRID"),
        Line::from("  ↑/↓ or j/k     - Move row selection"),
        Line::from("  ←/→ or h/l     - Move column cursor"),
        Line::from("  PgUp/PgDn       - Previous / next page"),
        Line::from("  [ / ]           - Previous / next page"),
        Line::from("  g / G           - First / last page"),
        Line::from("  Enter           - Open selected record"),
        Line::from("  s               - Sort by current column (toggles direction)"),
        Line::from("  S               - Clear sort"),
        Line::from("  /               - Search across all columns"),
        Line::from("  f               - Filter the current column"),
        Line::from("  c               - Clear search and filters"),
        Line::from(""),
        section("MOUSE"),
        Line::from("  Click header    - Sort by that column"),
        Line::from("  Click row       - Select and open the record"),
        Line::from("  Click page bar  - Jump to that page"),
        Line::from("  Scroll wheel    - Move row selection"),
        Line::from("  Drag divider    - Resize the detail split"),
        Line::from(""),
        section("DETAIL VIEW"),
        Line::from("  Esc/q/Backspace - Back to the grid"),
        Line::from("  ↑/↓ or j/k     - Scroll the notes panel"),
        Line::from("  < / >           - Shrink / grow the left pane"),
        Line::from("  n / p           - Next / previous record"),
        Line::from(""),
        section("CLIPBOARD"),
        Line::from("  y               - Copy current cell value"),
        Line::from("  Y               - Copy current record as JSON"),
        Line::from(""),
        section("GENERAL"),
        Line::from("  ? or F1         - Toggle this help"),
        Line::from("  q / Ctrl+C      - Quit"),
        Line::from(""),
        Line::from("Search and filter inputs:").style(Style::default().fg(Color::DarkGray)),
        Line::from("  Type to update the view as you pause; Enter applies"),
        Line::from("  immediately and Esc restores the previous pattern."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_exit_keys() {
        let mut overlay = HelpOverlay::new();
        assert_eq!(overlay.handle_key(key(KeyCode::Esc)), HelpAction::Exit);
        assert_eq!(overlay.handle_key(key(KeyCode::Char('q'))), HelpAction::Exit);
        assert_eq!(overlay.handle_key(key(KeyCode::F(1))), HelpAction::Exit);
    }

    #[test]
    fn test_scroll_stays_in_bounds() {
        let mut overlay = HelpOverlay::new();
        overlay.max_scroll = 5;
        for _ in 0..20 {
            overlay.handle_key(key(KeyCode::Down));
        }
        assert_eq!(overlay.scroll_offset, 5);
        overlay.handle_key(key(KeyCode::Home));
        assert_eq!(overlay.scroll_offset, 0);
        overlay.handle_key(key(KeyCode::Up));
        assert_eq!(overlay.scroll_offset, 0);
    }
}
