// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Path, PathBuf};

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path is not below `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_slash(rel));
    }

    // Different spellings of the same directory (macOS /private/var, symlinked
    // checkouts) only line up after canonicalization.
    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(to_slash(rel));
        }
    }

    None
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Best-effort absolute form of `path`: canonical when it exists, otherwise
/// joined onto the working directory.
pub fn absolutize(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root_and_normalizes_separators() {
        let root = Path::new("/project/sass");
        let path = Path::new("/project/sass/components/button.scss");
        assert_eq!(relative_str(root, path).as_deref(), Some("components/button.scss"));
    }

    #[test]
    fn unrelated_path_is_none() {
        assert_eq!(relative_str(Path::new("/project/sass"), Path::new("/elsewhere/x.scss")), None);
    }

    #[test]
    fn absolutize_keeps_missing_paths_absolute() {
        let abs = absolutize(Path::new("not/yet/created"));
        assert!(abs.is_absolute());
        assert!(abs.ends_with("not/yet/created"));
    }
}
