// src/config/model.rs

use std::path::{Path, PathBuf};

use lightningcss::targets::Browsers;
use serde::Deserialize;

use crate::types::ChangesWhileBuilding;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [paths]
/// source_dir = "assets/sass"
/// dest_dir = "assets/css"
///
/// [prefix]
/// grid = true
///
/// [watch]
/// debounce_ms = 100
/// ```
///
/// All sections are optional; an empty file yields the built-in defaults.
/// This is the raw, unvalidated form. Use `ConfigFile::try_from` to obtain a
/// validated [`ConfigFile`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub prefix: PrefixSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Validated configuration.
///
/// Paths in [`PathsSection`] are kept as written; the accessors resolve them
/// against [`ConfigFile::root`], the directory the config was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub paths: PathsSection,
    pub prefix: PrefixSection,
    pub watch: WatchSection,
    root: PathBuf,
    browsers: Browsers,
}

impl ConfigFile {
    /// Build a config without running validation. Prefer `try_from`.
    pub(crate) fn new_unchecked(
        paths: PathsSection,
        prefix: PrefixSection,
        watch: WatchSection,
        browsers: Browsers,
    ) -> Self {
        Self {
            paths,
            prefix,
            watch,
            root: PathBuf::new(),
            browsers,
        }
    }

    /// Re-anchor relative paths at `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Browser targets parsed from `[prefix].targets`.
    pub fn browsers(&self) -> Browsers {
        self.browsers
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.paths.source_dir)
    }

    pub fn dest_dir(&self) -> PathBuf {
        self.root.join(&self.paths.dest_dir)
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.dest_dir().join(&self.paths.bundle_name)
    }

    /// File name of the source map, e.g. `bundle.min.css.map`.
    pub fn map_name(&self) -> String {
        format!("{}.map", self.paths.bundle_name)
    }

    pub fn map_path(&self) -> PathBuf {
        self.dest_dir().join(self.map_name())
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Glob evaluated against paths relative to `source_dir`.
    #[serde(default = "default_source_glob")]
    pub source_glob: String,

    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,

    /// Bundle file name. The map is written next to it as `<bundle_name>.map`.
    #[serde(default = "default_bundle_name")]
    pub bundle_name: String,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("mobile_api_extensions/static/mobile_api_extensions/sass")
}

fn default_source_glob() -> String {
    "**/*".to_string()
}

fn default_dest_dir() -> PathBuf {
    PathBuf::from("mobile_api_extensions/static/mobile_api_extensions/css")
}

fn default_bundle_name() -> String {
    "bundle.min.css".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            source_glob: default_source_glob(),
            dest_dir: default_dest_dir(),
            bundle_name: default_bundle_name(),
        }
    }
}

/// `[prefix]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PrefixSection {
    /// Browser targets as `"<browser> <version>"` entries, e.g. `"ie 11"`.
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Emit IE grid prefixes (`-ms-grid`, `-ms-grid-columns`, ...).
    #[serde(default = "default_grid")]
    pub grid: bool,

    /// Only `false` is accepted; validation rejects `true` because minified
    /// output has no indentation to cascade.
    #[serde(default)]
    pub cascade: bool,
}

fn default_targets() -> Vec<String> {
    [
        "chrome 90",
        "edge 90",
        "firefox 78",
        "safari 13",
        "ios_saf 13",
        "samsung 12",
        "ie 11",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_grid() -> bool {
    true
}

impl Default for PrefixSection {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            grid: default_grid(),
            cascade: false,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Settle window in milliseconds; `0` triggers one build per event.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub changes_while_building: ChangesWhileBuilding,

    /// Skip a rebuild when the blake3 digest of the source set is unchanged.
    #[serde(default)]
    pub use_hash: bool,
}

fn default_debounce_ms() -> u64 {
    100
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            changes_while_building: ChangesWhileBuilding::default(),
            use_hash: false,
        }
    }
}
