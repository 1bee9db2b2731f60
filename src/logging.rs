//! Debug logging to a file.
//!
//! The interactive screens own the terminal, so tracing output never goes to
//! stdout or stderr. Without `--debug FILE` no subscriber is installed and
//! every event is dropped.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "LNKA_LOG";

/// Filter used when `LNKA_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "lnka=debug";

/// Builds the event filter from `LNKA_LOG`, falling back to [`DEFAULT_FILTER`].
#[must_use]
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens `path` fresh, removing any previous log first.
///
/// # Errors
///
/// Returns an error if an existing file cannot be removed or the new one
/// cannot be created.
pub fn open_log_file(path: &Path) -> Result<File> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to remove old debug log {}", path.display()));
        }
    }
    File::create(path).with_context(|| format!("Failed to create debug log {}", path.display()))
}

/// Installs the global subscriber when a debug file was requested.
///
/// # Errors
///
/// Returns an error if the log file cannot be prepared or a global
/// subscriber is already installed.
pub fn init(debug_file: Option<&Path>) -> Result<()> {
    let Some(path) = debug_file else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install debug logger: {e}"))?;

    tracing::debug!(version = crate::VERSION, "Debug logging started");
    Ok(())
}
