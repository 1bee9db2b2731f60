use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{Level, debug, span};

use crate::LnkaContext;
use crate::error::SelectError;
use crate::links::{self, ApplySummary};
use crate::output;
use crate::prompt;
use crate::select;
use crate::select::view::Theme;

/// Question asked before dangling links are removed.
pub const CLEAN_PROMPT: &str = "Do you want to clean these orphaned symlinks?";

/// The interactive steps of a run.
///
/// The terminal implementation drives the real screens; tests substitute
/// scripted answers.
pub trait Interaction {
    /// Asks a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::UserAborted`] if the user aborted, or another
    /// [`SelectError`] if the prompt could not be shown.
    fn confirm(&mut self, message: &str) -> Result<bool, SelectError>;

    /// Lets the user choose which source files should be linked.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::UserAborted`] if the user aborted, or another
    /// [`SelectError`] if loading or the terminal failed.
    fn select(
        &mut self,
        source_dir: &Path,
        target_dir: &Path,
        title: &str,
    ) -> Result<Vec<String>, SelectError>;
}

/// Interaction through the crossterm screens.
pub struct TerminalInteraction<'a> {
    /// UI configuration.
    config: &'a crate::config::Config,
}

impl<'a> TerminalInteraction<'a> {
    /// Creates the terminal interaction for `config`.
    #[must_use]
    pub const fn new(config: &'a crate::config::Config) -> Self {
        Self { config }
    }
}

impl Interaction for TerminalInteraction<'_> {
    fn confirm(&mut self, message: &str) -> Result<bool, SelectError> {
        prompt::show_confirmation(message, &Theme::from_config(&self.config.theme))
    }

    fn select(
        &mut self,
        source_dir: &Path,
        target_dir: &Path,
        title: &str,
    ) -> Result<Vec<String>, SelectError> {
        select::show_file_select(source_dir, target_dir, title, self.config)
    }
}

/// Runs one full session: orphan cleanup, selection, reconciliation.
///
/// # Errors
///
/// Returns an error if:
/// - The target directory cannot be scanned for orphans
/// - The user aborts the prompt or the selection (a [`SelectError::UserAborted`]
///   in the chain)
/// - Cleaning, loading or applying fails
pub fn execute(ctx: &LnkaContext, interaction: &mut impl Interaction) -> Result<ApplySummary> {
    let span = span!(Level::DEBUG, "link", source = %ctx.source_dir.display(), target = %ctx.target_dir.display());
    let _guard = span.enter();

    clean_orphans(ctx, interaction)?;

    let chosen = interaction
        .select(&ctx.source_dir, &ctx.target_dir, &ctx.title)
        .map_err(anyhow::Error::new)?;
    debug!(count = chosen.len(), "Selection confirmed");

    let summary = links::apply(&ctx.source_dir, &ctx.target_dir, &chosen)
        .context("Failed to apply changes")?;

    for name in &summary.removed {
        output::action("unlinked", name);
    }
    for name in &summary.created {
        output::action("linked", name);
    }
    Ok(summary)
}

/// Reports dangling links and removes them if the user agrees.
///
/// Returns the number of links removed.
fn clean_orphans(ctx: &LnkaContext, interaction: &mut impl Interaction) -> Result<usize> {
    let orphans =
        links::detect_orphans(&ctx.target_dir).context("Failed to validate symlinks")?;
    if orphans.is_empty() {
        return Ok(0);
    }

    report_orphans(&mut io::stderr().lock(), &orphans)
        .context("Failed to report orphaned symlinks")?;

    if !interaction.confirm(CLEAN_PROMPT)? {
        debug!(count = orphans.len(), "Orphan cleanup declined");
        return Ok(0);
    }

    links::clean_orphans(&ctx.target_dir, &orphans)
        .context("Failed to clean orphaned symlinks")?;
    output::success(&format!("Cleaned {} orphaned symlink(s)", orphans.len()));
    Ok(orphans.len())
}

/// Lists dangling links ahead of the cleanup question.
///
/// Printed at every verbosity: the user is never asked to remove links they
/// were not shown.
fn report_orphans(out: &mut impl Write, orphans: &[String]) -> io::Result<()> {
    let header = format!("Found {} orphaned symlink(s):", orphans.len());
    writeln!(out, "{}", header.yellow().bold())?;
    for name in orphans {
        writeln!(out, "  - {name}")?;
    }
    writeln!(out)
}
