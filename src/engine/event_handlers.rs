// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::engine::queue::PendingChanges;
use crate::engine::{BuildId, BuildOutcome, BuildRequest};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Start a pipeline run.
    StartBuild(BuildRequest),
    /// Request that the runtime stops.
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Tracks the single build slot: which build (if any) is running and how
/// many have finished.
#[derive(Debug, Default)]
pub struct BuildSlot {
    running: Option<BuildId>,
    next_id: BuildId,
    succeeded: usize,
    failed: usize,
}

impl BuildSlot {
    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    pub fn running(&self) -> Option<BuildId> {
        self.running
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    fn start(&mut self, changed: Vec<PathBuf>) -> BuildRequest {
        self.next_id += 1;
        let id = self.next_id;
        self.running = Some(id);
        BuildRequest { id, changed }
    }
}

/// Handle a batch of source changes.
///
/// Idle: start a build right away. Busy: hand the changes to the queue,
/// which decides whether they earn a follow-up build.
pub fn handle_sources_changed(
    slot: &mut BuildSlot,
    pending: &mut PendingChanges,
    paths: Vec<PathBuf>,
) -> CoreStep {
    if slot.is_idle() {
        let request = slot.start(paths);
        debug!(id = request.id, "starting build for source change");
        return CoreStep::running(vec![CoreCommand::StartBuild(request)]);
    }

    pending.record(paths);
    CoreStep::running(Vec::new())
}

/// Handle a finished build and start the owed follow-up, if any.
///
/// When `shutting_down` is set, the runtime was only waiting for this build
/// to finish and exits instead of starting another.
pub fn handle_build_finished(
    slot: &mut BuildSlot,
    pending: &mut PendingChanges,
    shutting_down: bool,
    id: BuildId,
    outcome: BuildOutcome,
) -> CoreStep {
    if slot.running != Some(id) {
        warn!(id, running = ?slot.running, "ignoring completion of unknown build");
        return CoreStep::running(Vec::new());
    }

    slot.running = None;
    match outcome {
        BuildOutcome::Success => slot.succeeded += 1,
        BuildOutcome::Failed => slot.failed += 1,
    }
    debug!(id, ?outcome, "build finished");

    if shutting_down {
        info!("in-flight build finished; shutting down");
        return CoreStep {
            commands: vec![CoreCommand::RequestExit],
            keep_running: false,
        };
    }

    let commands = match pending.take() {
        Some(paths) => {
            let request = slot.start(paths);
            debug!(id = request.id, "starting follow-up build for queued changes");
            vec![CoreCommand::StartBuild(request)]
        }
        None => Vec::new(),
    };
    CoreStep::running(commands)
}
