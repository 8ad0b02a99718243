//! Stateless grid rendering. Everything drawn here comes in through the
//! context; the returned [`GridLayout`] records where things landed so the
//! owning widget can map mouse clicks back to headers, rows, and page
//! buttons.

use crate::data::{ColumnSpec, Record};
use crate::view::pipeline::{self, ViewResult};
use crate::view::state::GridViewState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const MIN_COLUMN_WIDTH: u16 = 4;
const MAX_COLUMN_WIDTH: u16 = 50;
const COLUMN_PADDING: u16 = 2;
const ROW_NUMBER_WIDTH: u16 = 6;
const COLUMN_SPACING: u16 = 1;

/// Everything the renderer needs for one frame.
pub struct GridRenderContext<'a> {
    pub records: &'a [Record],
    pub columns: &'a [ColumnSpec],
    pub state: &'a GridViewState,
    pub view: &'a ViewResult,
    pub page_size: usize,
    /// Cursor position within the page.
    pub selected: usize,
    pub active_column: usize,
    pub loading: bool,
    pub empty_message: &'a str,
    pub show_row_numbers: bool,
    pub title: &'a str,
    pub header_fg: Color,
    pub selection_bg: Color,
}

/// One clickable element of the pagination line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Prev,
    Page(usize),
    Next,
}

/// Geometry of the frame just drawn, in screen coordinates.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    pub area: Rect,
    pub header_y: u16,
    pub first_body_y: u16,
    /// Body rows actually drawn (the page may be taller than the area).
    pub body_rows: usize,
    /// Screen x ranges of the data columns, index-aligned with the specs.
    pub column_spans: Vec<(u16, u16)>,
    pub pagination_y: Option<u16>,
    pub pagination_tokens: Vec<(u16, u16, PageToken)>,
}

impl GridLayout {
    pub fn column_at(&self, x: u16) -> Option<usize> {
        self.column_spans
            .iter()
            .position(|&(start, end)| x >= start && x < end)
    }

    pub fn body_row_at(&self, y: u16) -> Option<usize> {
        if y < self.first_body_y {
            return None;
        }
        let offset = (y - self.first_body_y) as usize;
        (offset < self.body_rows).then_some(offset)
    }

    pub fn page_token_at(&self, x: u16, y: u16) -> Option<PageToken> {
        if Some(y) != self.pagination_y {
            return None;
        }
        self.pagination_tokens
            .iter()
            .find(|&&(start, end, _)| x >= start && x < end)
            .map(|&(_, _, token)| token)
    }
}

/// Render the grid and report its geometry.
pub fn render_grid(f: &mut Frame, area: Rect, ctx: &GridRenderContext) -> GridLayout {
    let title = if ctx.loading {
        format!(" {} (loading...) ", ctx.title)
    } else {
        format!(
            " {} ({} of {} records) ",
            ctx.title,
            ctx.view.total_filtered,
            ctx.records.len()
        )
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 2 || inner.width < 4 {
        return GridLayout {
            area,
            ..GridLayout::default()
        };
    }

    let total_pages = pipeline::total_pages(ctx.view.total_filtered, ctx.page_size);
    let show_pagination = total_pages > 1 && !ctx.loading;
    let body_area = if show_pagination {
        Rect::new(inner.x, inner.y, inner.width, inner.height - 1)
    } else {
        inner
    };

    let widths = column_widths(ctx);
    let mut layout = GridLayout {
        area,
        header_y: body_area.y,
        first_body_y: body_area.y + 1,
        body_rows: 0,
        column_spans: column_spans(&widths, body_area, ctx.show_row_numbers),
        pagination_y: None,
        pagination_tokens: Vec::new(),
    };

    let header = build_header_row(ctx);
    let capacity = (body_area.height - 1) as usize;

    let rows: Vec<Row<'static>> = if ctx.loading {
        build_skeleton_rows(ctx, &widths, capacity)
    } else {
        build_data_rows(ctx, capacity)
    };
    layout.body_rows = rows.len();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(widths.len() + 1);
    if ctx.show_row_numbers {
        constraints.push(Constraint::Length(ROW_NUMBER_WIDTH));
    }
    constraints.extend(widths.iter().map(|&w| Constraint::Length(w)));

    let table = Table::new(rows, constraints)
        .header(header)
        .column_spacing(COLUMN_SPACING);
    f.render_widget(table, body_area);

    if !ctx.loading && ctx.view.page_rows.is_empty() {
        render_empty_message(f, body_area, ctx.empty_message);
    }

    if show_pagination {
        let y = inner.y + inner.height - 1;
        let pagination_area = Rect::new(inner.x, y, inner.width, 1);
        layout.pagination_y = Some(y);
        layout.pagination_tokens =
            render_pagination(f, pagination_area, ctx.view.page, total_pages);
    }

    layout
}

/// Fixed widths win; everything else is sized from the header and the
/// rows on this page, padded and clamped.
fn column_widths(ctx: &GridRenderContext) -> Vec<u16> {
    ctx.columns
        .iter()
        .map(|col| {
            if let Some(width) = col.width {
                return width;
            }
            // Room for the sort arrow and filter marker next to the name.
            let mut width = col.header.len() + 2;
            for &record_idx in &ctx.view.page_rows {
                if let Some(record) = ctx.records.get(record_idx) {
                    width = width.max(col.display_value(record).len());
                }
            }
            (width as u16 + COLUMN_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn column_spans(widths: &[u16], body_area: Rect, show_row_numbers: bool) -> Vec<(u16, u16)> {
    let mut spans = Vec::with_capacity(widths.len());
    let mut x = body_area.x;
    if show_row_numbers {
        x += ROW_NUMBER_WIDTH + COLUMN_SPACING;
    }
    let right_edge = body_area.x + body_area.width;
    for &width in widths {
        if x >= right_edge {
            break;
        }
        spans.push((x, (x + width).min(right_edge)));
        x += width + COLUMN_SPACING;
    }
    spans
}

fn build_header_row(ctx: &GridRenderContext) -> Row<'static> {
    let mut cells: Vec<Cell> = Vec::new();

    if ctx.show_row_numbers {
        cells.push(
            Cell::from("#").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }

    for (idx, col) in ctx.columns.iter().enumerate() {
        let arrow = ctx.state.sort_arrow(&col.key).unwrap_or("");
        let filter_marker = if ctx.state.filter_for(&col.key).is_some() {
            "*"
        } else {
            ""
        };

        let mut style = Style::default()
            .fg(ctx.header_fg)
            .add_modifier(Modifier::BOLD);
        if idx == ctx.active_column {
            style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }

        cells.push(Cell::from(format!("{}{} {}", col.header, filter_marker, arrow)).style(style));
    }

    Row::new(cells)
}

fn build_data_rows(ctx: &GridRenderContext, capacity: usize) -> Vec<Row<'static>> {
    ctx.view
        .page_rows
        .iter()
        .take(capacity)
        .enumerate()
        .map(|(row_idx, &record_idx)| {
            let mut cells: Vec<Cell> = Vec::new();

            if ctx.show_row_numbers {
                let position = (ctx.view.page - 1) * ctx.page_size + row_idx + 1;
                cells.push(
                    Cell::from(position.to_string()).style(Style::default().fg(Color::DarkGray)),
                );
            }

            // A record index out of range can only come from a stale view;
            // render the row empty instead of panicking.
            let record = ctx.records.get(record_idx);
            for col in ctx.columns {
                let text = record.map(|r| col.display_value(r)).unwrap_or_default();
                cells.push(Cell::from(text));
            }

            let row = Row::new(cells);
            if row_idx == ctx.selected {
                row.style(
                    Style::default()
                        .bg(ctx.selection_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        })
        .collect()
}

/// Placeholder bars while the caller is still producing the collection.
/// Pure display mode: no view state is touched to draw these.
fn build_skeleton_rows(
    ctx: &GridRenderContext,
    widths: &[u16],
    capacity: usize,
) -> Vec<Row<'static>> {
    let count = ctx.page_size.min(capacity);
    (0..count)
        .map(|_| {
            let mut cells: Vec<Cell> = Vec::new();
            if ctx.show_row_numbers {
                cells.push(Cell::from(""));
            }
            for &width in widths {
                let bar = "▒".repeat((width.saturating_sub(1)) as usize);
                cells.push(Cell::from(bar).style(Style::default().fg(Color::DarkGray)));
            }
            Row::new(cells)
        })
        .collect()
}

fn render_empty_message(f: &mut Frame, body_area: Rect, message: &str) {
    if body_area.height < 3 {
        return;
    }
    let area = Rect::new(body_area.x, body_area.y + 2, body_area.width, 1);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Yellow))
        .centered();
    f.render_widget(paragraph, area);
}

/// Draw the pagination line and report the x range of each token.
/// Previous/next render dimmed at their respective ends of the range.
fn render_pagination(
    f: &mut Frame,
    area: Rect,
    current: usize,
    total_pages: usize,
) -> Vec<(u16, u16, PageToken)> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut tokens: Vec<(u16, u16, PageToken)> = Vec::new();
    let mut x = area.x;

    let mut push = |spans: &mut Vec<Span<'static>>,
                    tokens: &mut Vec<(u16, u16, PageToken)>,
                    x: &mut u16,
                    text: String,
                    style: Style,
                    token: Option<PageToken>| {
        let width = text.chars().count() as u16;
        if let Some(token) = token {
            tokens.push((*x, *x + width, token));
        }
        spans.push(Span::styled(text, style));
        *x += width;
    };

    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let plain = Style::default();

    let prev_style = if current > 1 { enabled } else { disabled };
    push(
        &mut spans,
        &mut tokens,
        &mut x,
        "◀ Prev".to_string(),
        prev_style,
        (current > 1).then_some(PageToken::Prev),
    );
    push(&mut spans, &mut tokens, &mut x, "  ".to_string(), plain, None);

    for page in pipeline::page_window(current, total_pages) {
        let (text, style, token) = if page == current {
            (
                format!("[{}]", page),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                None,
            )
        } else {
            (format!(" {} ", page), enabled, Some(PageToken::Page(page)))
        };
        push(&mut spans, &mut tokens, &mut x, text, style, token);
    }

    push(&mut spans, &mut tokens, &mut x, "  ".to_string(), plain, None);
    let next_style = if current < total_pages { enabled } else { disabled };
    push(
        &mut spans,
        &mut tokens,
        &mut x,
        "Next ▶".to_string(),
        next_style,
        (current < total_pages).then_some(PageToken::Next),
    );

    spans.push(Span::styled(
        format!("  page {}/{}", current, total_pages),
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_column_at() {
        let layout = GridLayout {
            column_spans: vec![(2, 10), (11, 20), (21, 30)],
            ..GridLayout::default()
        };
        assert_eq!(layout.column_at(2), Some(0));
        assert_eq!(layout.column_at(9), Some(0));
        assert_eq!(layout.column_at(10), None);
        assert_eq!(layout.column_at(15), Some(1));
        assert_eq!(layout.column_at(40), None);
    }

    #[test]
    fn test_layout_body_row_at() {
        let layout = GridLayout {
            first_body_y: 4,
            body_rows: 3,
            ..GridLayout::default()
        };
        assert_eq!(layout.body_row_at(3), None);
        assert_eq!(layout.body_row_at(4), Some(0));
        assert_eq!(layout.body_row_at(6), Some(2));
        assert_eq!(layout.body_row_at(7), None);
    }

    #[test]
    fn test_column_spans_stop_at_right_edge() {
        let spans = column_spans(&[10, 10, 10], Rect::new(0, 0, 25, 10), false);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], (0, 10));
        assert_eq!(spans[1], (11, 21));
        // Third column is clipped by the area edge.
        assert_eq!(spans[2], (22, 25));
    }
}
