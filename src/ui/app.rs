//! Top-level interactive application: owns the record collection and the
//! widgets, runs the crossterm event loop, and restores the terminal on
//! the way out no matter how the loop ended.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::data::{Record, RecordSet};
use crate::text::{self, blocks_to_text, TextBlock};
use crate::ui::grid::{DataGrid, GridAction};
use crate::ui::help::{HelpAction, HelpOverlay};
use crate::ui::split::SplitPane;
use crate::view::SortOrder;
use crate::widgets::search_input::{InputAction, SearchInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Grid,
    Detail,
    Help,
}

/// Which view-state field the input overlay is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputTarget {
    Search,
    Filter(String),
}

struct DetailState {
    record_idx: usize,
    scroll: u16,
    max_scroll: u16,
    /// None when the record has no narrative source; the panel shows a
    /// placeholder instead.
    blocks: Option<Vec<TextBlock>>,
}

pub struct App {
    records: Vec<Record>,
    grid: DataGrid,
    split: SplitPane,
    help: HelpOverlay,
    input: SearchInput,
    input_target: InputTarget,
    input_restore: String,
    mode: AppMode,
    prev_mode: AppMode,
    detail: Option<DetailState>,
    notes_text: Option<String>,
    detail_text_key: Option<String>,
    status: String,
    divider_fg: Color,
    mouse_enabled: bool,
    should_quit: bool,
    last_detail_area: Rect,
}

impl App {
    pub fn new(set: RecordSet, config: &Config, notes_text: Option<String>) -> Self {
        let grid = DataGrid::new(set.columns, config.display.page_size)
            .with_title(set.name)
            .with_empty_message(config.display.empty_message.clone())
            .with_row_numbers(config.display.show_row_numbers)
            .with_colors(config.theme.header_fg(), config.theme.selection_bg());
        let split = SplitPane::new(
            config.split.initial_fraction,
            config.split.min_fraction,
            config.split.max_fraction,
        );
        Self {
            records: set.records,
            grid,
            split,
            help: HelpOverlay::new(),
            input: SearchInput::new(" Search ", config.behavior.search_debounce_ms),
            input_target: InputTarget::Search,
            input_restore: String::new(),
            mode: AppMode::Grid,
            prev_mode: AppMode::Grid,
            detail: None,
            notes_text,
            detail_text_key: config.display.detail_text_key.clone(),
            status: String::new(),
            divider_fg: config.theme.divider_fg(),
            mouse_enabled: config.behavior.mouse,
            should_quit: false,
            last_detail_area: Rect::default(),
        }
    }

    /// Start with a search already applied, e.g. from `--search`.
    pub fn set_initial_search(&mut self, pattern: &str) {
        self.grid.set_search(pattern);
    }

    /// Start with a sort already applied, e.g. from `--sort`.
    pub fn set_initial_sort(&mut self, key: &str, order: SortOrder) {
        self.grid.set_sort(key, order);
    }

    pub fn run(mut self) -> Result<()> {
        if let Err(e) = enable_raw_mode() {
            return Err(anyhow::anyhow!(
                "Failed to enable raw mode: {}. Is this a real terminal?",
                e
            ));
        }

        let mut stdout = io::stdout();
        let setup = if self.mouse_enabled {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        } else {
            execute!(stdout, EnterAlternateScreen)
        };
        if let Err(e) = setup {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
            }
        };

        let res = self.run_app(&mut terminal);

        // Always restore the terminal, even on error.
        let _ = disable_raw_mode();
        let _ = execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = terminal.show_cursor();

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!(records = self.records.len(), "entering interactive loop");
        loop {
            // Released search patterns arrive between input events, so the
            // poll below needs a timeout.
            if self.input.is_active() {
                if let Some(pattern) = self.input.check_debounce() {
                    self.apply_pattern(&pattern);
                }
            }

            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => {
                        // Windows delivers release events too; act on press only.
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key);
                        }
                    }
                    Event::Mouse(mouse) => {
                        if self.mouse_enabled {
                            self.handle_mouse(mouse);
                        }
                    }
                    _ => {}
                }
            }

            if self.should_quit {
                info!("leaving interactive loop");
                return Ok(());
            }
        }
    }

    fn apply_pattern(&mut self, pattern: &str) {
        match &self.input_target {
            InputTarget::Search => self.grid.set_search(pattern),
            InputTarget::Filter(key) => {
                let key = key.clone();
                self.grid.set_column_filter(key, pattern);
            }
        }
    }

    fn activate_search(&mut self) {
        self.input_target = InputTarget::Search;
        self.input_restore = self.grid.state().search_text.clone();
        let restore = self.input_restore.clone();
        self.input.activate(" Search all columns ", &restore);
    }

    fn activate_filter(&mut self) {
        let Some(col) = self.grid.active_column_spec() else {
            return;
        };
        if !col.filterable {
            self.status = format!("Column '{}' is not filterable", col.header);
            return;
        }
        let key = col.key.clone();
        let title = format!(" Filter: {} ", col.header);
        self.input_restore = self
            .grid
            .state()
            .filter_for(&key)
            .unwrap_or_default()
            .to_string();
        self.input_target = InputTarget::Filter(key);
        let restore = self.input_restore.clone();
        self.input.activate(title, &restore);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.input.is_active() {
            match self.input.handle_key(key) {
                InputAction::Submit(pattern) => self.apply_pattern(&pattern),
                InputAction::Cancel => {
                    // Debounced keystrokes may already have changed the
                    // view; put the pattern back the way it was.
                    let restore = self.input_restore.clone();
                    self.apply_pattern(&restore);
                }
                InputAction::Continue | InputAction::PassThrough => {}
            }
            return;
        }

        self.status.clear();

        match self.mode {
            AppMode::Help => {
                if self.help.handle_key(key) == HelpAction::Exit {
                    self.mode = self.prev_mode;
                }
            }
            AppMode::Grid => self.handle_grid_key(key),
            AppMode::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.open_help(),
            KeyCode::Char('/') => self.activate_search(),
            KeyCode::Char('f') => self.activate_filter(),
            KeyCode::Char('y') => self.yank_cell(),
            KeyCode::Char('Y') => self.yank_record(),
            _ => {
                if let GridAction::RowActivated(idx) = self.grid.handle_key(key, &self.records) {
                    self.open_detail(idx);
                }
            }
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                self.mode = AppMode::Grid;
                self.detail = None;
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.open_help(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_detail(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_detail(-1),
            KeyCode::PageDown => self.scroll_detail(10),
            KeyCode::PageUp => self.scroll_detail(-10),
            KeyCode::Char('<') => self.split.nudge(-1),
            KeyCode::Char('>') => self.split.nudge(1),
            KeyCode::Char('n') => {
                self.grid.select_next(&self.records);
                self.refresh_detail();
            }
            KeyCode::Char('p') => {
                self.grid.select_prev();
                self.refresh_detail();
            }
            KeyCode::Char('y') => self.yank_cell(),
            KeyCode::Char('Y') => self.yank_record(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match self.mode {
            AppMode::Grid => {
                if let GridAction::RowActivated(idx) = self.grid.handle_mouse(&mouse, &self.records)
                {
                    self.open_detail(idx);
                }
            }
            AppMode::Detail => {
                if self.split.handle_mouse(&mouse, self.last_detail_area) {
                    return;
                }
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_detail(-3),
                    MouseEventKind::ScrollDown => self.scroll_detail(3),
                    _ => {}
                }
            }
            AppMode::Help => {}
        }
    }

    fn open_help(&mut self) {
        self.prev_mode = self.mode;
        self.mode = AppMode::Help;
        self.help.on_enter();
    }

    fn open_detail(&mut self, record_idx: usize) {
        debug!(record_idx, "opening record detail");
        let blocks = self
            .records
            .get(record_idx)
            .and_then(|record| self.narrative_blocks(record));
        self.detail = Some(DetailState {
            record_idx,
            scroll: 0,
            max_scroll: 0,
            blocks,
        });
        self.mode = AppMode::Detail;
    }

    /// Rebuild the detail pane for the grid's current selection; fall back
    /// to the grid if the selection evaporated.
    fn refresh_detail(&mut self) {
        match self.grid.selected_record(&self.records) {
            Some(idx) => self.open_detail(idx),
            None => {
                self.mode = AppMode::Grid;
                self.detail = None;
            }
        }
    }

    fn scroll_detail(&mut self, delta: i32) {
        if let Some(detail) = &mut self.detail {
            let scroll = detail.scroll as i32 + delta;
            detail.scroll = scroll.clamp(0, detail.max_scroll as i32) as u16;
        }
    }

    fn narrative_blocks(&self, record: &Record) -> Option<Vec<TextBlock>> {
        if let Some(notes) = &self.notes_text {
            return Some(text::format(notes));
        }
        if let Some(key) = &self.detail_text_key {
            let value = record.display_value(key);
            if !value.is_empty() {
                return Some(text::format(&value));
            }
        }
        None
    }

    /// Header and displayed text of the cell under the cursor. Columns
    /// with a render hook yield the hook's output, the text on screen.
    fn selected_cell_text(&mut self) -> Option<(String, String)> {
        let record_idx = self.grid.selected_record(&self.records)?;
        let col = self.grid.active_column_spec()?;
        Some((col.header.clone(), col.display_value(&self.records[record_idx])))
    }

    fn yank_cell(&mut self) {
        let Some((header, value)) = self.selected_cell_text() else {
            self.status = "Nothing selected".to_string();
            return;
        };
        self.status = match copy_to_clipboard(&value) {
            Ok(()) => format!("Copied {}: {}", header, preview(&value)),
            Err(e) => format!("Clipboard error: {}", e),
        };
    }

    fn yank_record(&mut self) {
        let Some(record_idx) = self.grid.selected_record(&self.records) else {
            self.status = "Nothing selected".to_string();
            return;
        };
        let record = &self.records[record_idx];
        let json = match serde_json::to_string_pretty(&record.to_json()) {
            Ok(json) => json,
            Err(e) => {
                self.status = format!("Serialize error: {}", e);
                return;
            }
        };
        self.status = match copy_to_clipboard(&json) {
            Ok(()) => format!("Copied record as JSON ({} fields)", record.len()),
            Err(e) => format!("Clipboard error: {}", e),
        };
    }

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(f.area());

        match self.mode {
            AppMode::Grid => self.grid.render(f, chunks[0], &self.records),
            AppMode::Detail => self.render_detail(f, chunks[0]),
            AppMode::Help => self.help.render(f, chunks[0]),
        }

        self.render_status(f, chunks[1]);

        if self.input.is_active() {
            self.input.render(f, input_area(chunks[0]));
        }
    }

    fn render_detail(&mut self, f: &mut Frame, area: Rect) {
        self.last_detail_area = area;
        let (filtered, page, _) = self.grid.view_summary(&self.records);
        let position = (page - 1) * self.grid.page_size() + self.grid.selected_row() + 1;

        let (left, divider, right) = self.split.split(area);
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let Some(record) = self.records.get(detail.record_idx) else {
            return;
        };

        // Field card on the left, one line per declared column.
        let mut lines: Vec<Line> = Vec::new();
        for col in self.grid.columns() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", col.header),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(col.display_value(record)),
            ]));
        }
        let card = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Record {} of {} ", position, filtered)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(card, left);

        let divider_style = if self.split.is_dragging() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(self.divider_fg)
        };
        let bar: Vec<Line> = (0..divider.height).map(|_| Line::from("│")).collect();
        f.render_widget(Paragraph::new(Text::from(bar)).style(divider_style), divider);

        let panel = match &detail.blocks {
            Some(blocks) => {
                let text = blocks_to_text(blocks);
                let visible = right.height.saturating_sub(2);
                detail.max_scroll = (text.lines.len() as u16).saturating_sub(visible);
                detail.scroll = detail.scroll.min(detail.max_scroll);
                let title = if detail.max_scroll > 0 {
                    format!(" Notes ({}/{}) ", detail.scroll + 1, detail.max_scroll + 1)
                } else {
                    " Notes ".to_string()
                };
                Paragraph::new(text)
                    .block(Block::default().borders(Borders::ALL).title(title))
                    .wrap(Wrap { trim: false })
                    .scroll((detail.scroll, 0))
            }
            None => Paragraph::new(
                Line::from("No narrative text for this record")
                    .style(Style::default().fg(Color::DarkGray)),
            )
            .block(Block::default().borders(Borders::ALL).title(" Notes ")),
        };
        f.render_widget(panel, right);
    }

    fn render_status(&mut self, f: &mut Frame, area: Rect) {
        let left = if !self.status.is_empty() {
            self.status.clone()
        } else {
            match self.mode {
                AppMode::Grid => {
                    "/ search  f filter  s sort  Enter open  ? help  q quit".to_string()
                }
                AppMode::Detail => {
                    "Esc back  j/k scroll  </> resize  n/p record  y/Y copy".to_string()
                }
                AppMode::Help => "Esc close".to_string(),
            }
        };

        let (filtered, page, pages) = self.grid.view_summary(&self.records);
        let mut parts = vec![format!("{} of {} records", filtered, self.records.len())];
        if pages > 1 {
            parts.push(format!("page {}/{}", page, pages));
        }
        if let Some(sort) = &self.grid.state().sort {
            parts.push(format!("sort {}{}", sort.key, sort.order.arrow()));
        }
        if self.grid.state().has_active_query() {
            parts.push("filtered".to_string());
        }
        parts.push(chrono::Local::now().format("%H:%M").to_string());
        let right = parts.join(" • ");

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(right.len() as u16 + 1),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(Line::from(left).style(Style::default().fg(Color::DarkGray))),
            chunks[0],
        );
        f.render_widget(
            Paragraph::new(Line::from(right).style(Style::default().fg(Color::DarkGray)))
                .alignment(ratatui::layout::Alignment::Right),
            chunks[1],
        );
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Status-line preview of a copied value.
fn preview(value: &str) -> String {
    if value.chars().count() > 20 {
        let head: String = value.chars().take(17).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// Input overlay sits over the bottom rows of the body.
fn input_area(body: Rect) -> Rect {
    let height = 3.min(body.height);
    Rect {
        x: body.x,
        y: body.y + body.height - height,
        width: body.width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CellValue, ColumnSpec};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_app() -> App {
        let records: Vec<Record> = (0..15)
            .map(|i| {
                let mut record = Record::new();
                record.set("id", CellValue::Integer(i as i64));
                record.set("name", CellValue::String(format!("name{}", i)));
                record.set("notes", CellValue::String(format!("**Entry {}**\nBody", i)));
                record
            })
            .collect();
        let set = RecordSet {
            name: "sample".to_string(),
            records,
            columns: vec![ColumnSpec::from_key("id"), ColumnSpec::from_key("name")],
        };
        let mut config = Config::default();
        config.display.page_size = 5;
        config.display.detail_text_key = Some("notes".to_string());
        App::new(set, &config, None)
    }

    #[test]
    fn test_enter_opens_detail_and_esc_returns() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Detail);
        assert_eq!(app.detail.as_ref().map(|d| d.record_idx), Some(0));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Grid);
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_detail_blocks_come_from_text_key() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Enter));
        let blocks = app.detail.as_ref().and_then(|d| d.blocks.as_ref());
        assert!(blocks.is_some());
        assert_eq!(
            blocks.and_then(|b| b.first()),
            Some(&TextBlock::Header("Entry 0".to_string()))
        );
    }

    #[test]
    fn test_notes_file_overrides_text_key() {
        let records = vec![Record::from_iter([(
            "id",
            CellValue::Integer(1),
        )])];
        let set = RecordSet {
            name: "one".to_string(),
            records,
            columns: vec![ColumnSpec::from_key("id")],
        };
        let mut app = App::new(set, &Config::default(), Some("* item".to_string()));
        app.handle_key(key(KeyCode::Enter));
        let blocks = app.detail.as_ref().and_then(|d| d.blocks.as_ref());
        assert!(matches!(
            blocks.and_then(|b| b.first()),
            Some(TextBlock::Bullet { .. })
        ));
    }

    #[test]
    fn test_next_prev_step_records_in_detail() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.detail.as_ref().map(|d| d.record_idx), Some(1));
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.detail.as_ref().map(|d| d.record_idx), Some(0));
    }

    #[test]
    fn test_search_input_submit_applies_pattern() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.input.is_active());
        app.handle_key(key(KeyCode::Char('n')));
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.input.is_active());
        assert_eq!(app.grid.state().search_text, "na");
    }

    #[test]
    fn test_search_input_cancel_restores_previous() {
        let mut app = sample_app();
        app.set_initial_search("name1");
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.grid.state().search_text, "name1x");

        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.grid.state().search_text, "name1x");
    }

    #[test]
    fn test_filter_on_unfilterable_column_reports() {
        let records = vec![Record::from_iter([("id", CellValue::Integer(1))])];
        let set = RecordSet {
            name: "one".to_string(),
            records,
            columns: vec![ColumnSpec::from_key("id").with_filterable(false)],
        };
        let mut app = App::new(set, &Config::default(), None);
        app.handle_key(key(KeyCode::Char('f')));
        assert!(!app.input.is_active());
        assert!(app.status.contains("not filterable"));
    }

    #[test]
    fn test_selected_cell_text_uses_render_hook() {
        let records = vec![Record::from_iter([("age", CellValue::Integer(42))])];
        let set = RecordSet {
            name: "one".to_string(),
            records,
            columns: vec![ColumnSpec::new("age", "Age").with_render(|v, _| format!("{} yrs", v))],
        };
        let mut app = App::new(set, &Config::default(), None);
        assert_eq!(
            app.selected_cell_text(),
            Some(("Age".to_string(), "42 yrs".to_string()))
        );
    }

    #[test]
    fn test_help_returns_to_previous_mode() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.mode, AppMode::Help);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Detail);
    }

    #[test]
    fn test_ctrl_c_quits_even_during_input() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Char('/')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
