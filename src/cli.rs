//! Command-line interface definition for lnka.
//!
//! The definition is shared between the main binary and xtask, which renders
//! the man page from it.
//!
//! Note: Field-level documentation doubles as clap help text, so missing_docs
//! is relaxed for this module.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{ArgAction, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for lnka.
#[derive(Debug, Parser)]
#[command(
    name = "lnka",
    version = crate::VERSION,
    disable_version_flag = true,
    about = "Interactive symlink manager",
    long_about = "Pick which files from a source directory are linked into a target \
                  directory, sites-available/sites-enabled style. Dangling links in \
                  the target directory are offered for cleanup first."
)]
pub struct Cli {
    /// Directory holding the available files
    #[arg(required_unless_present = "completions", value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Directory receiving the symlinks
    #[arg(required_unless_present = "completions", value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Title shown above the file list
    #[arg(short, long, env = "LNKA_TITLE", default_value = "")]
    pub title: String,

    /// Write debug logs to FILE (truncated on start)
    #[arg(short, long, value_name = "FILE")]
    pub debug: Option<PathBuf>,

    /// Suppress informational messages
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report every link created or removed
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}
