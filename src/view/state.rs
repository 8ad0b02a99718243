use std::collections::HashMap;
use tracing::debug;

/// Sort direction. There is no "unsorted" variant; an unsorted grid is a
/// [`GridViewState`] whose `sort` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Header indicator glyph.
    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "↑",
            SortOrder::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub order: SortOrder,
}

/// The grid's ephemeral, UI-owned query state.
///
/// Reset rules: `page` snaps back to 1 whenever the search text or any
/// column filter changes; sort changes leave `page` alone, and the sort
/// itself survives search and filter edits.
#[derive(Debug, Clone, Default)]
pub struct GridViewState {
    pub search_text: String,
    pub column_filters: HashMap<String, String>,
    pub sort: Option<SortSpec>,
    /// 1-indexed; consumers clamp against the page count they compute.
    pub page: usize,
}

impl GridViewState {
    pub fn new() -> Self {
        Self {
            search_text: String::new(),
            column_filters: HashMap::new(),
            sort: None,
            page: 1,
        }
    }

    /// Update the global search text. Returns true when the text actually
    /// changed, in which case the page resets to 1.
    pub fn set_search(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.search_text {
            return false;
        }
        debug!(from = %self.search_text, to = %text, "search text changed");
        self.search_text = text;
        self.page = 1;
        true
    }

    /// Set or clear one column's filter; an empty pattern removes it.
    /// Returns true when the filter map changed (which resets the page).
    pub fn set_column_filter(&mut self, key: impl Into<String>, pattern: impl Into<String>) -> bool {
        let key = key.into();
        let pattern = pattern.into();
        let changed = if pattern.is_empty() {
            self.column_filters.remove(&key).is_some()
        } else if self.column_filters.get(&key) == Some(&pattern) {
            false
        } else {
            self.column_filters.insert(key.clone(), pattern.clone());
            true
        };
        if changed {
            debug!(column = %key, pattern = %pattern, "column filter changed");
            self.page = 1;
        }
        changed
    }

    pub fn filter_for(&self, key: &str) -> Option<&str> {
        self.column_filters.get(key).map(String::as_str)
    }

    /// Drop the search text and every column filter, back to page 1. The
    /// sort survives.
    pub fn reset_query(&mut self) {
        self.search_text.clear();
        self.column_filters.clear();
        self.page = 1;
    }

    /// Header-click protocol: a new key starts ascending; clicking the
    /// current key flips direction. Once a key is chosen the cycle is
    /// asc/desc only, never back to unsorted. The page is not touched.
    pub fn toggle_sort(&mut self, key: impl Into<String>) {
        let key = key.into();
        let order = match &self.sort {
            Some(sort) if sort.key == key => sort.order.toggled(),
            _ => SortOrder::Ascending,
        };
        debug!(column = %key, ?order, "sort toggled");
        self.sort = Some(SortSpec { key, order });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Direction indicator for `key`, when it is the active sort key.
    pub fn sort_arrow(&self, key: &str) -> Option<&'static str> {
        self.sort
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.order.arrow())
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// True when a search or filter narrows the collection.
    pub fn has_active_query(&self) -> bool {
        !self.search_text.is_empty() || !self.column_filters.is_empty()
    }
}
