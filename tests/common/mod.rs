#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A source/target directory pair for link tests
pub struct LinkDirs {
    pub temp_dir: TempDir,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl LinkDirs {
    /// Create `available/` and `enabled/` inside a fresh temp dir
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let source = temp_dir.path().join("available");
        let target = temp_dir.path().join("enabled");
        fs::create_dir(&source)?;
        fs::create_dir(&target)?;
        Ok(Self {
            temp_dir,
            source,
            target,
        })
    }

    /// Create with the given files in the source directory
    pub fn with_files(names: &[&str]) -> Result<Self> {
        let dirs = Self::new()?;
        for name in names {
            dirs.add_source_file(name)?;
        }
        Ok(dirs)
    }

    /// Write a small file into the source directory
    pub fn add_source_file(&self, name: &str) -> Result<()> {
        fs::write(self.source.join(name), format!("# {name}\n"))?;
        Ok(())
    }

    /// Link `target/name` to `raw` exactly as given
    #[cfg(unix)]
    pub fn link_raw(&self, name: &str, raw: impl AsRef<Path>) -> Result<()> {
        std::os::unix::fs::symlink(raw, self.target.join(name))?;
        Ok(())
    }

    /// Sorted names of every entry in the target directory
    pub fn target_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.target)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Raw target of the link `target/name`
    pub fn link_target(&self, name: &str) -> PathBuf {
        fs::read_link(self.target.join(name)).unwrap_or_default()
    }

    /// Get the temporary directory path
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for LinkDirs {
    fn default() -> Self {
        Self::new().expect("Failed to create test directories")
    }
}
