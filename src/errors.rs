// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylepipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Compilation failed for {}: {message}", file.display())]
    CompileError { file: PathBuf, message: String },

    #[error("Bundling failed: {0}")]
    BundleError(String),

    #[error("Source map error: {0}")]
    SourceMapError(String),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StylepipeError {
    /// True for failures caused by the style sources themselves, as opposed to
    /// the environment (filesystem, configuration, watcher).
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            StylepipeError::CompileError { .. } | StylepipeError::BundleError(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, StylepipeError>;
