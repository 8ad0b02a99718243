//! Interactive layer: the grid widget, the detail split view, and the
//! application shell that drives them.

pub mod app;
pub mod grid;
pub mod grid_render;
pub mod help;
pub mod split;

pub use app::App;
pub use grid::{DataGrid, GridAction};
pub use split::SplitPane;
