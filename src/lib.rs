// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod tasks;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{resolve_config, ConfigFile};
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::collect_sources;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution
/// - the real filesystem
/// - the selected task (single build, watch loop, or both)
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref())?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.dry_run {
        print_dry_run(&cfg, fs.as_ref())?;
        return Ok(());
    }

    tasks::run_task(args.task, Arc::new(cfg), fs).await?;
    Ok(())
}

/// Simple dry-run output: resolved config and the source set.
fn print_dry_run(cfg: &ConfigFile, fs: &dyn FileSystem) -> Result<()> {
    println!("stylepipe dry-run");
    println!("  paths.source_dir = {}", cfg.source_dir().display());
    println!("  paths.source_glob = {}", cfg.paths.source_glob);
    println!("  paths.dest_dir = {}", cfg.dest_dir().display());
    println!("  bundle = {}", cfg.bundle_path().display());
    println!("  map = {}", cfg.map_path().display());
    println!("  prefix.targets = {:?}", cfg.prefix.targets);
    println!("  prefix.grid = {}", cfg.prefix.grid);
    println!("  watch.debounce_ms = {}", cfg.watch.debounce_ms);
    println!(
        "  watch.changes_while_building = {:?}",
        cfg.watch.changes_while_building
    );
    println!("  watch.use_hash = {}", cfg.watch.use_hash);
    println!();

    if !fs.is_dir(&cfg.source_dir()) {
        println!("source directory does not exist");
        return Ok(());
    }

    let set = collect_sources(fs, cfg)?;
    println!("sources ({}):", set.files.len());
    for file in &set.files {
        println!("  - {} ({:?})", file.rel, file.kind);
    }
    if !set.partials.is_empty() {
        println!("partials ({}):", set.partials.len());
        for rel in &set.partials {
            println!("  - {rel}");
        }
    }
    if !set.skipped.is_empty() {
        println!("skipped ({}):", set.skipped.len());
        for rel in &set.skipped {
            println!("  - {rel}");
        }
    }

    debug!("dry-run complete (no compilation)");
    Ok(())
}
