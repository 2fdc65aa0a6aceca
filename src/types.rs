use std::str::FromStr;

use serde::Deserialize;

/// What the watch loop does with changes that arrive while a build is running.
///
/// - `Queue`: remember them and run exactly one more build once the current
///   one finishes (default).
/// - `Discard`: drop them; only changes made after the build completes
///   trigger a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangesWhileBuilding {
    Queue,
    Discard,
}

impl Default for ChangesWhileBuilding {
    fn default() -> Self {
        ChangesWhileBuilding::Queue
    }
}

impl FromStr for ChangesWhileBuilding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(ChangesWhileBuilding::Queue),
            "discard" => Ok(ChangesWhileBuilding::Discard),
            other => Err(format!(
                "invalid changes_while_building: {other} (expected \"queue\" or \"discard\")"
            )),
        }
    }
}

/// Named entry points exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskName {
    /// Compile the bundle once.
    Sass,
    /// Watch the sources and rebuild on every change.
    Watch,
    /// `sass`, then `watch`.
    Default,
    /// Alias for `sass`, meant for CI.
    Build,
}

impl TaskName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Sass => "sass",
            TaskName::Watch => "watch",
            TaskName::Default => "default",
            TaskName::Build => "build",
        }
    }
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
