//! View computation layer: query state plus the pure pipeline that turns
//! a record collection into a sorted, filtered page of row indices.

pub mod pipeline;
pub mod state;

pub use pipeline::{apply, filter_and_sort, page_window, total_pages, ViewResult};
pub use state::{GridViewState, SortOrder, SortSpec};
