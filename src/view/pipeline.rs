//! Pure view computation: filter, sort, paginate.
//!
//! Everything here is a function of its inputs. The grid recomputes the
//! view on every state change instead of patching it incrementally; the
//! collection is already resident in memory, so a full pass is cheap at
//! the sizes a page-bounded browser sees.

use crate::data::{CellValue, ColumnSpec, Record};
use crate::view::state::{GridViewState, SortOrder};
use std::cmp::Ordering;

/// Most page numbers shown at once in the pagination control.
pub const PAGE_WINDOW: usize = 5;

/// Result of one pipeline pass: the row indices of the requested page plus
/// the pre-slice filtered count the caller needs for page math.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    /// Indices into the source collection, in display order.
    pub page_rows: Vec<usize>,
    /// Filtered (pre-pagination) row count.
    pub total_filtered: usize,
    /// The page actually sliced, after clamping into range.
    pub page: usize,
}

/// Run the whole pipeline for one page.
///
/// Out-of-range pages clamp instead of erroring, so a filter change that
/// shrinks the collection can never strand the caller on a page past the
/// end.
pub fn apply(
    records: &[Record],
    columns: &[ColumnSpec],
    state: &GridViewState,
    page_size: usize,
) -> ViewResult {
    let order = filter_and_sort(records, columns, state);
    let total_filtered = order.len();
    let page = clamp_page(state.page, total_pages(total_filtered, page_size));
    let page_rows = page_slice(&order, page, page_size);
    ViewResult {
        page_rows,
        total_filtered,
        page,
    }
}

/// Filtered and sorted row indices for the full collection.
///
/// Filtering keeps input order; sorting is stable, so records that compare
/// equal on the sort key keep their relative input order. Without a sort
/// the insertion order survives untouched.
pub fn filter_and_sort(
    records: &[Record],
    columns: &[ColumnSpec],
    state: &GridViewState,
) -> Vec<usize> {
    let needle = state.search_text.to_lowercase();

    let mut order: Vec<usize> = (0..records.len())
        .filter(|&idx| {
            let record = &records[idx];
            matches_search(record, columns, &needle)
                && matches_column_filters(record, columns, state)
        })
        .collect();

    if let Some(sort) = &state.sort {
        order.sort_by(|&a, &b| {
            let ord = compare_cells(records[a].get(&sort.key), records[b].get(&sort.key));
            match sort.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }

    order
}

/// Global search: any column's displayed text contains the needle,
/// case-insensitively. Columns with a render hook match on the hook's
/// output, the same text drawn in the cell. An empty needle matches
/// everything.
fn matches_search(record: &Record, columns: &[ColumnSpec], needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    columns
        .iter()
        .any(|col| col.display_value(record).to_lowercase().contains(needle_lower))
}

/// Column filters AND together; each is a case-insensitive substring match
/// against the displayed text at its key. Missing keys stringify to "" and
/// so only ever match an empty pattern.
fn matches_column_filters(
    record: &Record,
    columns: &[ColumnSpec],
    state: &GridViewState,
) -> bool {
    state.column_filters.iter().all(|(key, pattern)| {
        let text = match columns.iter().find(|col| &col.key == key) {
            Some(col) => col.display_value(record),
            None => record.display_value(key),
        };
        text.to_lowercase().contains(&pattern.to_lowercase())
    })
}

/// Native ordering of two cells. Numbers compare numerically (integers and
/// floats mix), strings lexicographically. Null and missing values sort
/// after everything else ascending; mixed types fall back to comparing
/// their display strings.
pub fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
        (CellValue::Float(a), CellValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
        (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Greater,
        (_, CellValue::Null) => Ordering::Less,
        (a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

/// Number of pages the filtered collection spans; 0 when it is empty.
pub fn total_pages(total_filtered: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_filtered.div_ceil(page_size)
}

/// Clamp a 1-indexed page into `[1, total_pages]`, treating an empty
/// collection as a single page.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The `[(page-1)*size, page*size)` slice of the display order, clamped to
/// what exists.
pub fn page_slice(order: &[usize], page: usize, page_size: usize) -> Vec<usize> {
    let start = (page.max(1) - 1).saturating_mul(page_size).min(order.len());
    let end = start.saturating_add(page_size).min(order.len());
    order[start..end].to_vec()
}

/// Sliding window of up to [`PAGE_WINDOW`] page numbers centered on
/// `current`, clamped to `[1, total]`. Both ends still show a full window
/// when enough pages exist.
pub fn page_window(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    if start + PAGE_WINDOW - 1 > total {
        start = total.saturating_sub(PAGE_WINDOW - 1).max(1);
    }
    let end = (start + PAGE_WINDOW - 1).min(total);
    (start..=end).collect()
}
