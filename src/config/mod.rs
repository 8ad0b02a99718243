//! Configuration: TOML-backed settings for display, behavior, split
//! bounds, and theme colors.

pub mod config;

pub use config::Config;
