#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use stylepipe::config::{ConfigFile, RawConfigFile};
use stylepipe::types::ChangesWhileBuilding;
use tempfile::TempDir;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Paths default to `sass/` and `css/` relative to the root given to
/// [`ConfigFileBuilder::build_at`].
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.paths.source_dir = PathBuf::from("sass");
        config.paths.dest_dir = PathBuf::from("css");
        Self { config }
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.paths.source_dir = dir.into();
        self
    }

    pub fn dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.paths.dest_dir = dir.into();
        self
    }

    pub fn source_glob(mut self, glob: &str) -> Self {
        self.config.paths.source_glob = glob.to_string();
        self
    }

    pub fn bundle_name(mut self, name: &str) -> Self {
        self.config.paths.bundle_name = name.to_string();
        self
    }

    pub fn grid(mut self, enabled: bool) -> Self {
        self.config.prefix.grid = enabled;
        self
    }

    pub fn targets(mut self, targets: &[&str]) -> Self {
        self.config.prefix.targets = targets.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.watch.debounce_ms = ms;
        self
    }

    pub fn changes_while_building(mut self, behaviour: ChangesWhileBuilding) -> Self {
        self.config.watch.changes_while_building = behaviour;
        self
    }

    pub fn use_hash(mut self, val: bool) -> Self {
        self.config.watch.use_hash = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    /// Build and anchor relative paths at `root`.
    pub fn build_at(self, root: &Path) -> ConfigFile {
        self.build().with_root(root)
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A temporary project directory with a source and destination folder.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create an empty tree with `sass/` already present.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("sass")).expect("create sass dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `sass/<rel>`, creating parent directories.
    pub fn write_source(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join("sass").join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source parent");
        }
        fs::write(&path, contents).expect("write source");
        path
    }

    /// Config for this tree with default `sass/` and `css/` layout.
    pub fn config(&self) -> ConfigFile {
        ConfigFileBuilder::new().build_at(self.root())
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.root().join("css").join(name)).expect("read output")
    }

    pub fn output_exists(&self, name: &str) -> bool {
        self.root().join("css").join(name).is_file()
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}
