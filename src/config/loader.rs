// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StylepipeError};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, validate it and anchor its relative
/// paths at the directory containing the file.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config.with_root(config_root_dir(path)))
}

/// Pick the configuration for a run.
///
/// - An explicit path must exist.
/// - Without one, `Stylepipe.toml` is used when present; otherwise the
///   built-in defaults apply, anchored at the working directory.
pub fn resolve_config(explicit: Option<&str>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.is_file() {
                return Err(StylepipeError::ConfigError(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            info!(config = ?path, "loading config");
            load_and_validate(&path)
        }
        None => {
            let path = default_config_path();
            if path.is_file() {
                info!(config = ?path, "loading config");
                load_and_validate(&path)
            } else {
                debug!("no {:?} found; using built-in defaults", path);
                let cfg = ConfigFile::try_from(RawConfigFile::default())?;
                Ok(cfg.with_root(config_root_dir(&path)))
            }
        }
    }
}

/// Default config location: `Stylepipe.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Stylepipe.toml")
}

/// Directory that relative paths in a config are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "web/Stylepipe.toml"),
///   we use that directory.
/// - For a bare filename we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
