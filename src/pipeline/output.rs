// src/pipeline/output.rs

use std::path::PathBuf;

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::bundle::BundleOutput;
use crate::pipeline::sources::temp_sibling;

/// Write the bundle and its map into the destination directory.
///
/// Both files are staged as `<name>.tmp` first and only then renamed over
/// the previous artifacts, so a failure while writing leaves the old
/// outputs in place.
pub fn write_outputs(fs: &dyn FileSystem, cfg: &ConfigFile, output: &BundleOutput) -> Result<Vec<PathBuf>> {
    let targets = [
        (cfg.bundle_path(), output.css.as_bytes()),
        (cfg.map_path(), output.map.as_bytes()),
    ];

    for (path, contents) in &targets {
        let staged = temp_sibling(path);
        debug!(path = ?staged, bytes = contents.len(), "staging output");
        fs.write(&staged, contents)?;
    }

    let mut written = Vec::with_capacity(targets.len());
    for (path, _) in targets {
        fs.rename(&temp_sibling(&path), &path)?;
        written.push(path);
    }

    Ok(written)
}
