// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::ConfigFile;
use crate::pipeline::sources::{output_paths, SourceMatcher};
use crate::watch::path_utils::{absolutize, relative_str};

/// What the watcher considers part of the source set.
///
/// Paths handed to [`WatchProfile::matches`] are absolute event paths; they
/// are relativized against the source directory before the glob is applied.
/// The pipeline's own outputs are always excluded.
#[derive(Clone)]
pub struct WatchProfile {
    root: PathBuf,
    matcher: SourceMatcher,
    ignored: Vec<PathBuf>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("root", &self.root)
            .field("glob", &self.matcher.pattern())
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let root = absolutize(&cfg.source_dir());
        let dest = absolutize(&cfg.dest_dir());
        let ignored = output_paths(cfg)
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| dest.join(name))
            .collect();

        Ok(Self {
            root,
            matcher: SourceMatcher::new(&cfg.paths.source_glob)?,
            ignored,
        })
    }

    /// Absolute source directory the watcher subscribes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.ignored.iter().any(|ignored| ignored == path) {
            return false;
        }
        match relative_str(&self.root, path) {
            Some(rel) if !rel.is_empty() => self.matcher.matches(&rel),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfigFile;

    fn profile(glob: &str, source: &Path, dest: &Path) -> WatchProfile {
        let mut raw = RawConfigFile::default();
        raw.paths.source_dir = source.to_path_buf();
        raw.paths.dest_dir = dest.to_path_buf();
        raw.paths.source_glob = glob.to_string();
        WatchProfile::from_config(&ConfigFile::try_from(raw).unwrap()).unwrap()
    }

    #[test]
    fn matches_paths_below_root_through_glob() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("sass");
        std::fs::create_dir_all(&src).unwrap();
        let p = profile("**/*.scss", &src, &dir.path().join("css"));

        assert!(p.matches(&p.root().join("a.scss")));
        assert!(p.matches(&p.root().join("deep/b.scss")));
        assert!(!p.matches(&p.root().join("notes.txt")));
        assert!(!p.matches(&dir.path().join("css/a.scss")));
        assert!(!p.matches(p.root()));
    }

    #[test]
    fn outputs_inside_source_dir_never_match() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("sass");
        let dest = src.join("dist");
        std::fs::create_dir_all(&dest).unwrap();
        let p = profile("**/*", &src, &dest);

        assert!(!p.matches(&p.root().join("dist/bundle.min.css")));
        assert!(!p.matches(&p.root().join("dist/bundle.min.css.map.tmp")));
        assert!(p.matches(&p.root().join("dist/other.css")));
    }
}
