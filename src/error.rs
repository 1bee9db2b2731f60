//! Error types for link reconciliation and the selection session.
//!
//! Both enums carry a fixed taxonomy so callers can branch on the kind of
//! failure (in particular, telling a user abort apart from a real error)
//! instead of matching on message text.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Failures raised while reading or rewriting the target directory.
#[derive(Debug)]
pub enum LinkError {
    /// Unexpected OS failure (permission, disk, race with another process).
    Io {
        /// Path the failing operation was applied to.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// A file that must exist for the operation is missing.
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// Refused to remove an entry that is not a symbolic link.
    NotASymlink {
        /// The entry that was left untouched.
        path: PathBuf,
    },
}

impl LinkError {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::NotFound { path } | Self::NotASymlink { path } => path,
        }
    }

    /// Short description of the error kind.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O Error",
            Self::NotFound { .. } => "Not Found",
            Self::NotASymlink { .. } => "Not A Symlink",
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "{}", path.display()),
            Self::NotFound { path } => write!(f, "{} does not exist", path.display()),
            Self::NotASymlink { path } => {
                write!(f, "{} is not a symlink, refusing to remove", path.display())
            }
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } | Self::NotASymlink { .. } => None,
        }
    }
}

/// Outcomes of an interactive session that are not a confirmed selection.
#[derive(Debug)]
pub enum SelectError {
    /// The user aborted. This is a normal terminal outcome, not a failure.
    UserAborted,
    /// The source directory has no candidate files.
    EmptySource {
        /// Directory that was listed.
        dir: PathBuf,
    },
    /// Loading the source listing or the enabled set failed.
    Load(LinkError),
    /// The terminal could not be driven (raw mode, reading events, drawing).
    Terminal(io::Error),
}

impl SelectError {
    /// Returns true for the user-abort outcome.
    #[must_use]
    pub const fn is_abort(&self) -> bool {
        matches!(self, Self::UserAborted)
    }

    /// Short description of the error kind.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::UserAborted => "Aborted",
            Self::EmptySource { .. } => "Empty Source",
            Self::Load(_) => "Load Error",
            Self::Terminal(_) => "Terminal Error",
        }
    }
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserAborted => write!(f, "user aborted"),
            Self::EmptySource { dir } => {
                write!(f, "no files available to enable in {}", dir.display())
            }
            Self::Load(_) => write!(f, "failed to load files"),
            Self::Terminal(_) => write!(f, "terminal error"),
        }
    }
}

impl std::error::Error for SelectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Terminal(err) => Some(err),
            Self::UserAborted | Self::EmptySource { .. } => None,
        }
    }
}

impl From<LinkError> for SelectError {
    fn from(err: LinkError) -> Self {
        Self::Load(err)
    }
}

impl From<io::Error> for SelectError {
    fn from(err: io::Error) -> Self {
        Self::Terminal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_link_error_messages() {
        let err = LinkError::NotASymlink {
            path: PathBuf::from("/etc/nginx/sites-enabled/default"),
        };
        assert_eq!(
            err.to_string(),
            "/etc/nginx/sites-enabled/default is not a symlink, refusing to remove"
        );
        assert_eq!(err.error_type(), "Not A Symlink");

        let err = LinkError::NotFound {
            path: PathBuf::from("src/a.conf"),
        };
        assert_eq!(err.to_string(), "src/a.conf does not exist");
        assert_eq!(err.path(), Path::new("src/a.conf"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = LinkError::io(
            "/tmp/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "/tmp/x");
    }

    #[test]
    fn test_error_chain_names_each_cause_once() {
        let err = LinkError::io(
            "/srv/enabled/a.conf",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        let chained = anyhow::Error::new(err).context("Failed to apply changes");
        assert_eq!(
            format!("{chained:#}"),
            "Failed to apply changes: /srv/enabled/a.conf: Permission denied"
        );

        let load = SelectError::from(LinkError::io(
            "/srv/avail",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        ));
        assert_eq!(
            format!("{:#}", anyhow::Error::new(load)),
            "failed to load files: /srv/avail: Permission denied"
        );
    }

    #[test]
    fn test_select_error_abort_detection() {
        assert!(SelectError::UserAborted.is_abort());
        assert_eq!(SelectError::UserAborted.to_string(), "user aborted");

        let load: SelectError = LinkError::NotFound {
            path: PathBuf::from("x"),
        }
        .into();
        assert!(!load.is_abort());
        assert!(load.source().is_some());
    }
}
