// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::TaskName;

/// Command-line arguments for `stylepipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stylepipe",
    version,
    about = "Compile, prefix, minify and bundle stylesheets; optionally watch for changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Task to run: `sass`, `watch`, `default` (sass then watch) or `build`.
    #[arg(value_enum, default_value_t = TaskName::Default)]
    pub task: TaskName,

    /// Path to the config file (TOML).
    ///
    /// When omitted and `Stylepipe.toml` does not exist, built-in defaults
    /// are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STYLEPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and list the source set, but don't compile anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_defaults_to_default() {
        let args = CliArgs::try_parse_from(["stylepipe"]).unwrap();
        assert_eq!(args.task, TaskName::Default);
        assert!(args.config.is_none());
        assert!(!args.dry_run);
    }

    #[test]
    fn parses_task_and_flags() {
        let args = CliArgs::try_parse_from([
            "stylepipe",
            "build",
            "--config",
            "ci/Stylepipe.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.task, TaskName::Build);
        assert_eq!(args.config.as_deref(), Some("ci/Stylepipe.toml"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }

    #[test]
    fn rejects_unknown_task() {
        assert!(CliArgs::try_parse_from(["stylepipe", "deploy"]).is_err());
    }
}
