use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "record-browser";

/// Platform config directory for this app, created on first use.
/// Linux: ~/.config/record-browser, macOS: ~/Library/Application Support.
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("Could not determine the platform config directory")?
        .join(APP_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    Ok(dir)
}

/// Platform data directory for this app, created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine the platform data directory")?
        .join(APP_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir)
}

/// Log directory under the data directory, created on first use.
pub fn log_dir() -> Result<PathBuf> {
    let dir = data_dir()?.join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    Ok(dir)
}
