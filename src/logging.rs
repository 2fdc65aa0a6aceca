// src/logging.rs

//! Logging setup for `stylepipe` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `STYLEPIPE_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! `STYLEPIPE_LOG` takes a single level name, not `RUST_LOG`-style
//! directives; unknown values fall back to `info`.
//!
//! Logs go to STDERR, so compiler diagnostics never mix with `--dry-run`
//! output on stdout.
//!
//! What shows up at each level:
//! - `error`: Sass compile failures, with a `file` field naming the source
//!   that broke the build; failed rebuilds during `watch`.
//! - `warn`: a failed initial build in `default` before watching starts.
//! - `info`: one `bundle written` line per build (`compiled`, `bytes`,
//!   `elapsed_ms`, `bundle`), watcher start and detected changes.
//! - `debug`: source-set classification, skipped files, staged outputs,
//!   coalesced watch events and runtime decisions.
//!
//! The notify callback runs outside any subscriber context and reports its
//! own errors on stderr directly.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Name of the environment variable consulted when no CLI level is given.
pub const LOG_ENV_VAR: &str = "STYLEPIPE_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => env_value
            .and_then(parse_level_str)
            .unwrap_or(tracing::Level::INFO),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
