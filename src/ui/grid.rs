//! The interactive data grid: owns the view state, routes keys and mouse
//! events into state changes, and hands row activations up to the caller.
//! The caller owns the records and selection semantics; the grid never
//! mutates the collection it is shown.

use crate::data::{ColumnSpec, Record};
use crate::ui::grid_render::{render_grid, GridLayout, GridRenderContext, PageToken};
use crate::view::pipeline::{self, ViewResult};
use crate::view::state::{GridViewState, SortOrder, SortSpec};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, style::Color, Frame};
use tracing::debug;

/// What a key or mouse event amounted to, from the caller's view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    /// Handled internally (or ignored); nothing for the caller to do.
    None,
    /// The user activated a row; the index points into the caller's
    /// record collection.
    RowActivated(usize),
}

pub struct DataGrid {
    columns: Vec<ColumnSpec>,
    state: GridViewState,
    page_size: usize,
    selected: usize,
    active_column: usize,
    loading: bool,
    empty_message: String,
    title: String,
    show_row_numbers: bool,
    header_fg: Color,
    selection_bg: Color,
    view: Option<ViewResult>,
    layout: GridLayout,
}

impl DataGrid {
    pub fn new(columns: Vec<ColumnSpec>, page_size: usize) -> Self {
        Self {
            columns,
            state: GridViewState::new(),
            page_size: page_size.max(1),
            selected: 0,
            active_column: 0,
            loading: false,
            empty_message: "No matching records".to_string(),
            title: "records".to_string(),
            show_row_numbers: true,
            header_fg: Color::Cyan,
            selection_bg: Color::DarkGray,
            view: None,
            layout: GridLayout::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_row_numbers(mut self, show: bool) -> Self {
        self.show_row_numbers = show;
        self
    }

    pub fn with_colors(mut self, header_fg: Color, selection_bg: Color) -> Self {
        self.header_fg = header_fg;
        self.selection_bg = selection_bg;
        self
    }

    pub fn state(&self) -> &GridViewState {
        &self.state
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Pure display mode while the caller produces a new collection; the
    /// view state is left untouched.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// The caller swapped the record collection out from under us.
    pub fn invalidate(&mut self) {
        self.view = None;
    }

    /// Column key under the column cursor.
    pub fn active_column_key(&self) -> Option<&str> {
        self.columns.get(self.active_column).map(|c| c.key.as_str())
    }

    pub fn active_column_spec(&self) -> Option<&ColumnSpec> {
        self.columns.get(self.active_column)
    }

    /// Record index (into the caller's collection) under the row cursor.
    pub fn selected_record(&mut self, records: &[Record]) -> Option<usize> {
        let selected = self.selected;
        self.ensure_view(records).page_rows.get(selected).copied()
    }

    /// Row cursor position within the current page.
    pub fn selected_row(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, records: &[Record]) {
        self.selected += 1;
        self.clamp_selection(records);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Totals for the status line: (filtered count, page, total pages).
    pub fn view_summary(&mut self, records: &[Record]) -> (usize, usize, usize) {
        let total_filtered = self.ensure_view(records).total_filtered;
        let total = pipeline::total_pages(total_filtered, self.page_size);
        (total_filtered, self.state.page, total)
    }

    /// Preset the sort, e.g. from a command line flag.
    pub fn set_sort(&mut self, key: impl Into<String>, order: SortOrder) {
        self.state.sort = Some(SortSpec {
            key: key.into(),
            order,
        });
        self.invalidate();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        if self.state.set_search(text) {
            self.selected = 0;
            self.invalidate();
        }
    }

    pub fn set_column_filter(&mut self, key: impl Into<String>, pattern: impl Into<String>) {
        if self.state.set_column_filter(key, pattern) {
            self.selected = 0;
            self.invalidate();
        }
    }

    /// Clear search and filters; the sort stays.
    pub fn reset_query(&mut self) {
        self.state.reset_query();
        self.selected = 0;
        self.invalidate();
    }

    fn toggle_sort_on(&mut self, column: usize) {
        let Some(col) = self.columns.get(column) else {
            return;
        };
        if !col.sortable {
            debug!(column = %col.key, "sort request on unsortable column ignored");
            return;
        }
        let key = col.key.clone();
        self.state.toggle_sort(key);
        self.invalidate();
    }

    fn set_page(&mut self, page: usize, records: &[Record]) {
        let total = self.total_pages(records);
        self.state.set_page(pipeline::clamp_page(page, total));
        self.selected = 0;
        self.invalidate();
    }

    fn total_pages(&mut self, records: &[Record]) -> usize {
        let total_filtered = self.ensure_view(records).total_filtered;
        pipeline::total_pages(total_filtered, self.page_size)
    }

    fn ensure_view(&mut self, records: &[Record]) -> &ViewResult {
        if self.view.is_none() {
            let view = pipeline::apply(records, &self.columns, &self.state, self.page_size);
            // Keep the stored page in step with what was actually sliced.
            self.state.set_page(view.page);
            self.view = Some(view);
        }
        self.view.as_ref().unwrap()
    }

    fn clamp_selection(&mut self, records: &[Record]) {
        let len = self.ensure_view(records).page_rows.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, records: &[Record]) -> GridAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(records);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.active_column = self.active_column.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.active_column + 1 < self.columns.len() {
                    self.active_column += 1;
                }
            }
            KeyCode::PageDown | KeyCode::Char(']') => {
                let page = self.state.page + 1;
                self.set_page(page, records);
            }
            KeyCode::PageUp | KeyCode::Char('[') => {
                let page = self.state.page.saturating_sub(1);
                self.set_page(page, records);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.set_page(1, records);
            }
            KeyCode::End | KeyCode::Char('G') => {
                let last = self.total_pages(records);
                self.set_page(last, records);
            }
            KeyCode::Char('s') => {
                self.toggle_sort_on(self.active_column);
            }
            KeyCode::Char('S') => {
                self.state.clear_sort();
                self.invalidate();
            }
            KeyCode::Char('c') => {
                self.reset_query();
            }
            KeyCode::Enter => {
                if let Some(record_idx) = self.selected_record(records) {
                    return GridAction::RowActivated(record_idx);
                }
            }
            _ => {}
        }
        GridAction::None
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent, records: &[Record]) -> GridAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row == self.layout.header_y {
                    if let Some(column) = self.layout.column_at(mouse.column) {
                        self.active_column = column;
                        self.toggle_sort_on(column);
                    }
                    return GridAction::None;
                }

                if let Some(token) = self.layout.page_token_at(mouse.column, mouse.row) {
                    let page = match token {
                        PageToken::Prev => self.state.page.saturating_sub(1),
                        PageToken::Next => self.state.page + 1,
                        PageToken::Page(page) => page,
                    };
                    self.set_page(page, records);
                    return GridAction::None;
                }

                if let Some(row) = self.layout.body_row_at(mouse.row) {
                    let page_len = self.ensure_view(records).page_rows.len();
                    if row < page_len {
                        self.selected = row;
                        if let Some(record_idx) = self.selected_record(records) {
                            return GridAction::RowActivated(record_idx);
                        }
                    }
                }
                GridAction::None
            }
            MouseEventKind::ScrollUp => {
                self.select_prev();
                GridAction::None
            }
            MouseEventKind::ScrollDown => {
                self.select_next(records);
                GridAction::None
            }
            _ => GridAction::None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, records: &[Record]) {
        // Loading draws placeholders only; the pipeline does not run and
        // the stored view, page, and selection stay as they were.
        let view = if self.loading {
            ViewResult {
                page_rows: Vec::new(),
                total_filtered: 0,
                page: self.state.page,
            }
        } else {
            self.clamp_selection(records);
            self.ensure_view(records).clone()
        };
        let ctx = GridRenderContext {
            records,
            columns: &self.columns,
            state: &self.state,
            view: &view,
            page_size: self.page_size,
            selected: self.selected,
            active_column: self.active_column,
            loading: self.loading,
            empty_message: &self.empty_message,
            show_row_numbers: self.show_row_numbers,
            title: &self.title,
            header_fg: self.header_fg,
            selection_bg: self.selection_bg,
        };
        self.layout = render_grid(f, area, &ctx);
    }
}
