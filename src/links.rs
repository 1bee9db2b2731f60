//! Symlink reconciliation between a source and a target directory.
//!
//! The target directory expresses which source files are active through
//! symbolic links. Everything here is a plain function over directory
//! contents: list what exists, derive which files are enabled, find broken
//! links, and apply the difference between the enabled set and a new
//! selection.
//!
//! Link targets are compared lexically. A relative target is joined onto the
//! target directory, both sides are made absolute and cleaned, and the
//! resulting strings must match exactly. Symlinks in parent directories are
//! never resolved, so two paths that only meet after following such links
//! are considered different.

use crate::error::LinkError;
use crate::utils::paths;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, span, warn};

/// Changes performed by [`apply`], in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Links removed because their file was deselected.
    pub removed: Vec<String>,
    /// Links created for newly selected files.
    pub created: Vec<String>,
}

impl ApplySummary {
    /// Returns true if the filesystem was not touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.created.is_empty()
    }
}

/// Lists the candidate files directly inside `source_dir`, sorted by name.
///
/// Directories are skipped. Symlinks are listed as files without being
/// followed, so a link to a directory is still a candidate.
///
/// # Errors
///
/// Returns [`LinkError::Io`] if the directory or one of its entries cannot
/// be read.
pub fn list_source_files(source_dir: &Path) -> Result<Vec<String>, LinkError> {
    let entries = fs::read_dir(source_dir).map_err(|e| LinkError::io(source_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LinkError::io(source_dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| LinkError::io(entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(raw) => warn!(name = ?raw, "Skipping source entry with non UTF-8 name"),
        }
    }

    files.sort();
    debug!(dir = %source_dir.display(), count = files.len(), "Listed source files");
    Ok(files)
}

/// Maps every symlink directly inside `target_dir` to its raw target.
///
/// Regular files and directories are ignored. Entries that disappear or
/// cannot be inspected while scanning are skipped.
///
/// # Errors
///
/// Returns [`LinkError::Io`] if the directory itself cannot be read.
pub fn list_target_symlinks(target_dir: &Path) -> Result<BTreeMap<String, PathBuf>, LinkError> {
    let entries = fs::read_dir(target_dir).map_err(|e| LinkError::io(target_dir, e))?;

    let mut links = BTreeMap::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_symlink() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            warn!(name = ?entry.file_name(), "Skipping symlink with non UTF-8 name");
            continue;
        };
        match fs::read_link(entry.path()) {
            Ok(raw_target) => {
                links.insert(name, raw_target);
            }
            Err(e) => debug!(name = %name, error = %e, "Skipping unreadable symlink"),
        }
    }

    Ok(links)
}

/// Names whose symlink in `target_dir` points at the same name in `source_dir`.
///
/// # Errors
///
/// Returns [`LinkError::Io`] if the target directory cannot be read or the
/// current directory is needed and unavailable.
pub fn enabled_set(source_dir: &Path, target_dir: &Path) -> Result<BTreeSet<String>, LinkError> {
    let links = list_target_symlinks(target_dir)?;

    let mut enabled = BTreeSet::new();
    for (name, raw_target) in links {
        let resolved = paths::resolve_link_target(target_dir, &raw_target);
        let resolved = paths::absolute_clean(&resolved).map_err(|e| LinkError::io(&resolved, e))?;
        let expected = source_dir.join(&name);
        let expected = paths::absolute_clean(&expected).map_err(|e| LinkError::io(&expected, e))?;

        if resolved == expected {
            enabled.insert(name);
        }
    }

    debug!(count = enabled.len(), "Computed enabled set");
    Ok(enabled)
}

/// Finds symlinks in `target_dir` whose target does not exist, sorted by name.
///
/// The target does not need to lie inside `source_dir`; any broken link in
/// the target directory is reported.
///
/// # Errors
///
/// Returns [`LinkError::Io`] if the target directory cannot be read.
pub fn detect_orphans(target_dir: &Path) -> Result<Vec<String>, LinkError> {
    let links = list_target_symlinks(target_dir)?;

    let orphans: Vec<String> = links
        .into_iter()
        .filter(|(_, raw_target)| {
            let resolved = paths::resolve_link_target(target_dir, raw_target);
            matches!(fs::metadata(&resolved), Err(e) if e.kind() == io::ErrorKind::NotFound)
        })
        .map(|(name, _)| name)
        .collect();

    if !orphans.is_empty() {
        info!(count = orphans.len(), "Found orphaned symlinks");
    }
    Ok(orphans)
}

/// Removes the named symlinks from `target_dir`.
///
/// Stops at the first failure; links removed before it stay removed.
///
/// # Errors
///
/// Returns the error of the first [`remove_symlink`] call that failed.
pub fn clean_orphans(target_dir: &Path, names: &[String]) -> Result<(), LinkError> {
    for name in names {
        remove_symlink(target_dir, name)?;
        debug!(name = %name, "Removed orphaned symlink");
    }
    Ok(())
}

/// Chooses what to store in a new link: relative when strictly shorter.
///
/// The comparison is on string length only.
fn link_value(source_path: &Path, target_dir: &Path) -> Result<PathBuf, LinkError> {
    let absolute = paths::absolute_clean(source_path).map_err(|e| LinkError::io(source_path, e))?;
    let base = paths::absolute_clean(target_dir).map_err(|e| LinkError::io(target_dir, e))?;

    match paths::relative_to(&absolute, &base) {
        Some(relative)
            if relative.is_relative()
                && relative.as_os_str().len() < absolute.as_os_str().len() =>
        {
            Ok(relative)
        }
        _ => Ok(absolute),
    }
}

/// Links `target_dir/name` to `source_dir/name`.
///
/// Anything already present at the link path is replaced.
///
/// # Errors
///
/// - [`LinkError::NotFound`] if the source file does not exist
/// - [`LinkError::Io`] if the old entry cannot be removed or the link cannot
///   be created
pub fn create_symlink(source_dir: &Path, target_dir: &Path, name: &str) -> Result<(), LinkError> {
    let source_path = source_dir.join(name);
    let link_path = target_dir.join(name);

    match fs::metadata(&source_path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LinkError::NotFound { path: source_path });
        }
        Err(e) => return Err(LinkError::io(source_path, e)),
    }

    if fs::symlink_metadata(&link_path).is_ok() {
        fs::remove_file(&link_path).map_err(|e| LinkError::io(&link_path, e))?;
        debug!(path = %link_path.display(), "Replaced existing entry");
    }

    let value = link_value(&source_path, target_dir)?;
    symlink(&value, &link_path).map_err(|e| LinkError::io(&link_path, e))?;

    debug!(name = %name, target = %value.display(), "Created symlink");
    Ok(())
}

/// Creates the link itself.
#[cfg(unix)]
fn symlink(value: &Path, link_path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(value, link_path)
}

/// Creates the link itself.
#[cfg(windows)]
fn symlink(value: &Path, link_path: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(value, link_path)
}

/// Removes the symlink `target_dir/name`.
///
/// Nothing at the path is not an error.
///
/// # Errors
///
/// - [`LinkError::NotASymlink`] if the entry exists but is not a symlink;
///   it is left in place
/// - [`LinkError::Io`] if inspecting or removing the entry fails
pub fn remove_symlink(target_dir: &Path, name: &str) -> Result<(), LinkError> {
    let link_path = target_dir.join(name);

    let metadata = match fs::symlink_metadata(&link_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(LinkError::io(link_path, e)),
    };

    if !metadata.file_type().is_symlink() {
        return Err(LinkError::NotASymlink { path: link_path });
    }

    fs::remove_file(&link_path).map_err(|e| LinkError::io(&link_path, e))?;
    debug!(name = %name, "Removed symlink");
    Ok(())
}

/// Makes the enabled set of `target_dir` equal to `selected`.
///
/// Deselected links are removed first, then missing links are created in
/// selection order. Names listed twice are applied once. The first failure
/// stops the pass and leaves earlier changes in place.
///
/// # Errors
///
/// Returns the first [`LinkError`] raised while computing the enabled set or
/// changing a link.
pub fn apply(
    source_dir: &Path,
    target_dir: &Path,
    selected: &[String],
) -> Result<ApplySummary, LinkError> {
    let span = span!(Level::DEBUG, "apply", selected = selected.len());
    let _guard = span.enter();

    let current = enabled_set(source_dir, target_dir)?;
    let wanted: HashSet<&str> = selected.iter().map(String::as_str).collect();

    let mut summary = ApplySummary::default();

    for name in &current {
        if !wanted.contains(name.as_str()) {
            remove_symlink(target_dir, name)?;
            summary.removed.push(name.clone());
        }
    }

    let mut seen = HashSet::new();
    for name in selected {
        if current.contains(name) || !seen.insert(name.as_str()) {
            continue;
        }
        create_symlink(source_dir, target_dir, name)?;
        summary.created.push(name.clone());
    }

    info!(
        removed = summary.removed.len(),
        created = summary.created.len(),
        "Applied selection"
    );
    Ok(summary)
}
