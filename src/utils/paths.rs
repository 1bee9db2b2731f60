use std::io;
use std::path::{Component, Path, PathBuf};

/// Makes a path absolute, resolving relative paths from current directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn make_absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir()?;
        Ok(current_dir.join(path))
    }
}

/// Lexically normalizes a path without touching the filesystem.
///
/// Removes `.` components, folds `name/..` pairs, and drops `..` directly
/// under the root. Leading `..` components of a relative path are kept.
/// Symlinks in intermediate directories are not resolved.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Makes a path absolute and then lexically normalizes it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    Ok(clean(&make_absolute(path)?))
}

/// Resolves the raw target of a symlink stored in `link_dir`.
///
/// Absolute targets are returned as-is; relative targets are joined onto the
/// directory holding the link.
#[must_use]
pub fn resolve_link_target(link_dir: &Path, raw_target: &Path) -> PathBuf {
    if raw_target.is_absolute() {
        raw_target.to_path_buf()
    } else {
        link_dir.join(raw_target)
    }
}

/// Computes the path of `path` relative to the directory `base`.
///
/// Both inputs are expected to be absolute and clean. Returns `None` when no
/// relative form exists.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let relative = pathdiff::diff_paths(path, base)?;
    if relative.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_absolute() {
        let absolute = PathBuf::from("/absolute/path");
        let result = make_absolute(&absolute).unwrap();
        assert_eq!(result, absolute);

        let relative = PathBuf::from("relative/path");
        let result = make_absolute(&relative).unwrap();
        assert!(result.is_absolute());
        assert!(result.ends_with("relative/path"));
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/a/./b/")), PathBuf::from("/a/b"));
        assert_eq!(clean(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean(Path::new("../a/../../b")), PathBuf::from("../../b"));
        assert_eq!(clean(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(clean(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_absolute_clean_is_lexical() {
        let result = absolute_clean(Path::new("/srv/sites-enabled/../sites-available/a.conf")).unwrap();
        assert_eq!(result, PathBuf::from("/srv/sites-available/a.conf"));
    }

    #[test]
    fn test_resolve_link_target() {
        let dir = Path::new("/etc/nginx/sites-enabled");
        assert_eq!(
            resolve_link_target(dir, Path::new("../sites-available/default")),
            PathBuf::from("/etc/nginx/sites-enabled/../sites-available/default")
        );
        assert_eq!(
            resolve_link_target(dir, Path::new("/opt/default")),
            PathBuf::from("/opt/default")
        );
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/tmp/x/source/a.conf"), Path::new("/tmp/x/target")),
            Some(PathBuf::from("../source/a.conf"))
        );
        assert_eq!(
            relative_to(Path::new("/tmp/x/a.conf"), Path::new("/tmp/x")),
            Some(PathBuf::from("a.conf"))
        );
        assert_eq!(
            relative_to(Path::new("/a/b/c/d"), Path::new("/a/x/y")),
            Some(PathBuf::from("../../b/c/d"))
        );
    }
}
