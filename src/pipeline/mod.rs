// src/pipeline/mod.rs

//! The style pipeline: enumerate → compile → prefix → minify/concatenate →
//! source map → write.
//!
//! Each stage fails fast. Nothing is written unless every stage before the
//! write succeeded, so a broken source leaves the previous bundle untouched.

pub mod bundle;
pub mod compile;
pub mod output;
pub mod prefix;
pub mod sources;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::config::ConfigFile;
use crate::errors::{Result, StylepipeError};
use crate::fs::FileSystem;

pub use bundle::{bundle_units, BundleNames, BundleOutput, CompiledUnit};
pub use sources::{collect_sources, SourceFile, SourceKind, SourceMatcher, SourceSet};

/// Summary of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub compiled: usize,
    pub partials: usize,
    pub skipped: usize,
    pub bundle_bytes: usize,
    pub written: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Run the full pipeline once against `fs`.
pub fn run_pipeline(cfg: &ConfigFile, fs: &dyn FileSystem) -> Result<BuildReport> {
    let started = Instant::now();
    let source_dir = cfg.source_dir();

    if !fs.is_dir(&source_dir) {
        return Err(StylepipeError::IoError(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source directory {:?} does not exist", source_dir),
        )));
    }

    let set = collect_sources(fs, cfg)?;
    debug!(
        files = set.files.len(),
        partials = set.partials.len(),
        skipped = set.skipped.len(),
        "collected source set"
    );

    let mut units = Vec::with_capacity(set.files.len());
    for file in &set.files {
        let compiled = compile::compile_source(fs, file, &source_dir).inspect_err(|err| {
            error!(file = %file.path.display(), "{err}");
        })?;

        let css = if cfg.prefix.grid {
            prefix::add_grid_prefixes(&compiled)
        } else {
            compiled
        };

        units.push(CompiledUnit {
            source_name: file.rel.clone(),
            css,
        });
    }

    let map_name = cfg.map_name();
    let names = BundleNames {
        bundle: &cfg.paths.bundle_name,
        map: &map_name,
    };
    let output = bundle_units(&units, names, cfg.browsers()).inspect_err(|err| {
        error!("{err}");
    })?;

    let written = output::write_outputs(fs, cfg, &output)?;

    let report = BuildReport {
        compiled: set.files.len(),
        partials: set.partials.len(),
        skipped: set.skipped.len(),
        bundle_bytes: output.css.len(),
        written,
        elapsed: started.elapsed(),
    };

    info!(
        compiled = report.compiled,
        bytes = report.bundle_bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        bundle = %cfg.bundle_path().display(),
        "bundle written"
    );

    Ok(report)
}
