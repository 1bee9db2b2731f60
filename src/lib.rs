#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Cursor and page arithmetic is clamped to list bounds
#![allow(clippy::indexing_slicing)] // Bounds checked by logic

//! # lnka - Interactive Symlink Manager
//!
//! lnka manages a "sites-available / sites-enabled" style pair of
//! directories: every regular file in the source directory can be enabled by
//! a symbolic link of the same name in the target directory.
//!
//! ## Features
//!
//! - **Interactive selection**: a terminal multi-select list with filtering,
//!   a linked-only view and configurable key bindings
//! - **Minimal reconciliation**: only the links that differ from the chosen
//!   set are removed or created
//! - **Relative links**: links are written relative to the target directory
//!   whenever that is shorter than the absolute path
//! - **Orphan cleanup**: dangling links are reported and removed on request
//!
//! ## Architecture
//!
//! - [`links`]: reading the directories and applying a selection
//! - [`select`]: the selection state machine, key bindings and rendering
//! - [`prompt`]: yes/no confirmation dialog
//! - [`commands`]: the orchestrating `link` command
//! - [`config`]: optional UI configuration file
//! - [`output`]: styled, verbosity-aware messages
//! - [`utils`]: path helpers
//!
//! ## Example Usage
//!
//! ```no_run
//! use lnka::{LnkaContext, config::Config, links};
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = LnkaContext::new(
//!     "/etc/nginx/sites-available".into(),
//!     "/etc/nginx/sites-enabled".into(),
//!     String::new(),
//!     Config::default(),
//! )?;
//!
//! // Enable exactly these two sites, non-interactively
//! let summary = links::apply(
//!     &ctx.source_dir,
//!     &ctx.target_dir,
//!     &["default".to_string(), "blog".to_string()],
//! )?;
//! println!("{} created, {} removed", summary.created.len(), summary.removed.len());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations.
pub mod commands;

/// UI configuration parsing and validation.
pub mod config;

/// Error types for reconciliation and the selection session.
pub mod error;

/// Reading the source and target directories and reconciling links.
pub mod links;

/// Debug log setup.
pub mod logging;

/// Output formatting.
pub mod output;

/// Yes/no confirmation dialog.
pub mod prompt;

/// Interactive file selection.
pub mod select;

/// Raw-mode terminal handling.
pub mod terminal;

/// Utility functions and helpers.
pub mod utils;

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Current version of the lnka binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one lnka run operates on.
///
/// Construction validates both directories, so a context always refers to
/// two existing directories.
///
/// # Examples
///
/// ```no_run
/// use lnka::{LnkaContext, config::Config};
///
/// # fn main() -> anyhow::Result<()> {
/// let ctx = LnkaContext::new(
///     "sites-available".into(),
///     "sites-enabled".into(),
///     "Sites".to_string(),
///     Config::default(),
/// )?;
/// assert_eq!(ctx.title, "Sites");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LnkaContext {
    /// Directory holding the available files.
    pub source_dir: PathBuf,

    /// Directory receiving the symlinks.
    pub target_dir: PathBuf,

    /// Title shown above the selection list; empty for none.
    pub title: String,

    /// Loaded UI configuration.
    pub config: config::Config,
}

impl LnkaContext {
    /// Creates a context after checking both directories.
    ///
    /// # Errors
    ///
    /// Returns an error if either path does not exist or is not a directory.
    pub fn new(
        source_dir: PathBuf,
        target_dir: PathBuf,
        title: String,
        config: config::Config,
    ) -> Result<Self> {
        check_directory("source directory", &source_dir)?;
        check_directory("target directory", &target_dir)?;

        Ok(Self {
            source_dir,
            target_dir,
            title,
            config,
        })
    }
}

/// Fails unless `path` is an existing directory.
fn check_directory(role: &str, path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => bail!("{role}: {} is not a directory", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            bail!("{role}: {} does not exist", path.display())
        }
        Err(e) => bail!("{role}: cannot access {}: {e}", path.display()),
    }
}
