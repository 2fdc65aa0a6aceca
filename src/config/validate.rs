// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StylepipeError};
use crate::pipeline::prefix::parse_targets;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::StylepipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let browsers = parse_targets(&raw.prefix.targets).map_err(StylepipeError::ConfigError)?;
        Ok(ConfigFile::new_unchecked(
            raw.paths,
            raw.prefix,
            raw.watch,
            browsers,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_paths(cfg)?;
    validate_bundle_name(&cfg.paths.bundle_name)?;
    validate_glob(&cfg.paths.source_glob)?;
    validate_prefix(cfg)?;
    Ok(())
}

fn validate_prefix(cfg: &RawConfigFile) -> Result<()> {
    if cfg.prefix.cascade {
        return Err(StylepipeError::ConfigError(
            "[prefix].cascade = true is not supported: the bundle is minified, so there is \
             no indentation to align prefixed declarations with"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_paths(cfg: &RawConfigFile) -> Result<()> {
    if cfg.paths.source_dir.as_os_str().is_empty() {
        return Err(StylepipeError::ConfigError(
            "[paths].source_dir must not be empty".to_string(),
        ));
    }
    if cfg.paths.dest_dir.as_os_str().is_empty() {
        return Err(StylepipeError::ConfigError(
            "[paths].dest_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_bundle_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StylepipeError::ConfigError(
            "[paths].bundle_name must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(StylepipeError::ConfigError(format!(
            "[paths].bundle_name must be a plain file name (got '{name}')"
        )));
    }
    Ok(())
}

fn validate_glob(pattern: &str) -> Result<()> {
    Glob::new(pattern).map_err(|e| {
        StylepipeError::ConfigError(format!("[paths].source_glob is invalid: {e}"))
    })?;
    Ok(())
}
