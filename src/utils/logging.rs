//! File-backed tracing setup. The TUI owns stdout and stderr while it is
//! running, so log output goes to a timestamped file under the app's data
//! directory instead.

use crate::utils::paths;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted for the tracing filter, e.g.
/// `RECORD_BROWSER_LOG=record_browser=trace`.
pub const LOG_ENV_VAR: &str = "RECORD_BROWSER_LOG";

/// Initialize tracing into `<data dir>/logs/record-browser_<timestamp>.log`
/// and return the path. On Unix a `latest.log` symlink tracks the current
/// run so `tail -f latest.log` keeps working across restarts.
pub fn init_file_logging(default_filter: &str) -> Result<PathBuf> {
    let log_dir = paths::log_dir()?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("record-browser_{}.log", timestamp));
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

    #[cfg(unix)]
    {
        let latest = log_dir.join("latest.log");
        let _ = std::fs::remove_file(&latest);
        let _ = std::os::unix::fs::symlink(&log_path, &latest);
    }

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!("logging initialized, writing to {}", log_path.display());
    Ok(log_path)
}
