//! Styled terminal messages for the lnka CLI.
//!
//! Everything goes to stderr so stdout stays free for the interactive
//! screens. Verbosity is a process-wide setting:
//! - Quiet: warnings and errors only
//! - Normal: the usual report lines
//! - Verbose: one line per link created or removed as well

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Verbosity level for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Suppress informational messages, show only warnings and errors.
    Quiet = 0,
    /// Default verbosity level, show all standard messages.
    Normal = 1,
    /// Show per-link messages in addition to standard output.
    Verbose = 2,
}

/// Global verbosity setting (default: Normal).
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level for all output functions.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the current global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints a success message in green (respects quiet mode).
pub fn success(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.green());
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an action line with a dimmed verb, e.g. `linked nginx.conf`.
///
/// Only shown in verbose mode.
pub fn action(verb: &str, message: &str) {
    if get_verbosity() != Verbosity::Verbose {
        return;
    }
    eprintln!("{} {}", verb.dimmed().bold(), message);
}
