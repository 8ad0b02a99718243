//! Utility helpers: debounce timing, file logging, app directories.

pub mod debouncer;
pub mod logging;
pub mod paths;

pub use debouncer::Debouncer;
