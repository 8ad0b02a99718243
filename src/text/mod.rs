//! Narrative text layer: the line classifier and its renderable output.

pub mod blocks;
pub mod formatter;
pub mod render;

pub use blocks::{RichLine, TextBlock, TextRun};
pub use formatter::{format, parse_inline};
pub use render::blocks_to_text;
