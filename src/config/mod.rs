// src/config/mod.rs

//! Configuration loading and validation for stylepipe.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to built-in defaults
//!   (`loader.rs`).
//! - Validate paths, globs and browser targets (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve_config};
pub use model::{ConfigFile, PathsSection, PrefixSection, RawConfigFile, WatchSection};
