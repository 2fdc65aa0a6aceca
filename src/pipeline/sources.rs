// src/pipeline/sources.rs

//! Source set enumeration.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::ConfigFile;
use crate::fs::FileSystem;

/// Syntax of a style-source, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Scss,
    Sass,
    Css,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "scss" => Some(SourceKind::Scss),
            "sass" => Some(SourceKind::Sass),
            "css" => Some(SourceKind::Css),
            _ => None,
        }
    }
}

/// A style-source selected for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as seen by the [`FileSystem`].
    pub path: PathBuf,
    /// Forward-slash path relative to the source directory; also the name
    /// recorded in the source map.
    pub rel: String,
    pub kind: SourceKind,
}

/// Files matched by the source glob, in concatenation order.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    pub files: Vec<SourceFile>,
    /// Matched partials (`_name.scss`); compiled only through imports.
    pub partials: Vec<String>,
    /// Matched files that are not style-sources.
    pub skipped: Vec<String>,
}

impl SourceSet {
    /// Every matched path, including partials and skipped files.
    pub fn all_rel_paths(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(|f| f.rel.as_str())
            .chain(self.partials.iter().map(String::as_str))
            .chain(self.skipped.iter().map(String::as_str))
    }
}

/// Compiled source glob, evaluated against paths relative to the source
/// directory (e.g. `"components/button.scss"`).
#[derive(Clone)]
pub struct SourceMatcher {
    pattern: String,
    glob_set: GlobSet,
}

impl fmt::Debug for SourceMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMatcher")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl SourceMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
        let mut builder = GlobSetBuilder::new();
        builder.add(glob);
        Ok(Self {
            pattern: pattern.to_string(),
            glob_set: builder.build()?,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.glob_set.is_match(rel_path)
    }
}

/// Output paths that must never be treated as sources, even when the
/// destination lives inside the source directory.
pub fn output_paths(cfg: &ConfigFile) -> Vec<PathBuf> {
    let bundle = cfg.bundle_path();
    let map = cfg.map_path();
    vec![
        temp_sibling(&bundle),
        temp_sibling(&map),
        bundle,
        map,
    ]
}

/// `<path>.tmp`, the staging name used while replacing an output file.
pub fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Walk the source directory and classify every file matching the glob.
///
/// The result is sorted by relative path so concatenation order does not
/// depend on directory iteration order.
pub fn collect_sources(fs: &dyn FileSystem, cfg: &ConfigFile) -> Result<SourceSet> {
    let root = cfg.source_dir();
    let matcher = SourceMatcher::new(&cfg.paths.source_glob)?;
    let outputs = output_paths(cfg);

    let mut set = SourceSet::default();
    let mut stack = vec![root.clone()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
                continue;
            }
            if !fs.is_file(&path) || outputs.contains(&path) {
                continue;
            }
            let Ok(rel) = path.strip_prefix(&root) else {
                continue;
            };
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if !matcher.matches(&rel_str) {
                continue;
            }

            let is_partial = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('_'));

            match SourceKind::from_path(&path) {
                Some(_) if is_partial => set.partials.push(rel_str),
                Some(kind) => set.files.push(SourceFile {
                    path,
                    rel: rel_str,
                    kind,
                }),
                None => {
                    debug!(file = %rel_str, "not a style-source; skipping");
                    set.skipped.push(rel_str);
                }
            }
        }
    }

    set.files.sort_by(|a, b| a.rel.cmp(&b.rel));
    set.partials.sort();
    set.skipped.sort();
    Ok(set)
}
