//! Terminal record browser: a generic sortable, filterable, paginated
//! grid over semi-structured records, with a narrative text formatter
//! and a draggable split detail view.
//!
//! The layering is strict. [`data`] knows nothing about views, [`view`]
//! computes row orderings without touching a terminal, and [`ui`] is the
//! only layer that renders.

pub mod config;
pub mod data;
pub mod text;
pub mod ui;
pub mod utils;
pub mod view;
pub mod widgets;
