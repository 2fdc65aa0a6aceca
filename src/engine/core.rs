// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for
//! reading events from channels and handing builds to the backend.
//!
//! The core is unit tested without any Tokio, channels, filesystem or
//! pipeline runs.

use crate::engine::event_handlers::{
    handle_build_finished, handle_sources_changed, BuildSlot, CoreCommand, CoreStep,
};
use crate::engine::queue::PendingChanges;
use crate::engine::RuntimeEvent;
use crate::types::ChangesWhileBuilding;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    slot: BuildSlot,
    pending: PendingChanges,
    shutting_down: bool,
}

impl CoreRuntime {
    pub fn new(behaviour: ChangesWhileBuilding) -> Self {
        Self {
            slot: BuildSlot::default(),
            pending: PendingChanges::new(behaviour),
            shutting_down: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.slot.is_idle()
    }

    pub fn queue_is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn slot(&self) -> &BuildSlot {
        &self.slot
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::SourcesChanged { .. } if self.shutting_down => CoreStep {
                commands: Vec::new(),
                keep_running: true,
            },
            RuntimeEvent::SourcesChanged { paths } => {
                handle_sources_changed(&mut self.slot, &mut self.pending, paths)
            }
            RuntimeEvent::BuildFinished { id, outcome } => handle_build_finished(
                &mut self.slot,
                &mut self.pending,
                self.shutting_down,
                id,
                outcome,
            ),
            RuntimeEvent::ShutdownRequested => {
                self.pending.clear();
                if self.slot.is_idle() {
                    CoreStep {
                        commands: vec![CoreCommand::RequestExit],
                        keep_running: false,
                    }
                } else {
                    // Let the in-flight build finish writing its outputs.
                    self.shutting_down = true;
                    CoreStep {
                        commands: Vec::new(),
                        keep_running: true,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BuildOutcome, BuildRequest};
    use std::path::PathBuf;

    fn changed(paths: &[&str]) -> RuntimeEvent {
        RuntimeEvent::SourcesChanged {
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }

    fn started(step: &CoreStep) -> Vec<BuildRequest> {
        step.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::StartBuild(r) => Some(r.clone()),
                CoreCommand::RequestExit => None,
            })
            .collect()
    }

    #[test]
    fn idle_change_starts_a_build() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Queue);
        let step = core.step(changed(&["a.scss"]));

        let builds = started(&step);
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].id, 1);
        assert_eq!(builds[0].changed, vec![PathBuf::from("a.scss")]);
        assert!(!core.is_idle());
    }

    #[test]
    fn changes_during_build_yield_exactly_one_follow_up() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Queue);
        core.step(changed(&["a.scss"]));

        assert!(started(&core.step(changed(&["b.scss"]))).is_empty());
        assert!(started(&core.step(changed(&["c.scss"]))).is_empty());
        assert!(!core.queue_is_empty());

        let step = core.step(RuntimeEvent::BuildFinished {
            id: 1,
            outcome: BuildOutcome::Success,
        });
        let builds = started(&step);
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].id, 2);
        assert_eq!(
            builds[0].changed,
            vec![PathBuf::from("b.scss"), PathBuf::from("c.scss")]
        );

        let step = core.step(RuntimeEvent::BuildFinished {
            id: 2,
            outcome: BuildOutcome::Failed,
        });
        assert!(started(&step).is_empty());
        assert!(core.is_idle());
        assert_eq!(core.slot().succeeded(), 1);
        assert_eq!(core.slot().failed(), 1);
    }

    #[test]
    fn discard_drops_changes_during_build() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Discard);
        core.step(changed(&["a.scss"]));
        core.step(changed(&["b.scss"]));

        let step = core.step(RuntimeEvent::BuildFinished {
            id: 1,
            outcome: BuildOutcome::Success,
        });
        assert!(started(&step).is_empty());
        assert!(core.is_idle());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Queue);
        core.step(changed(&["a.scss"]));

        let step = core.step(RuntimeEvent::BuildFinished {
            id: 7,
            outcome: BuildOutcome::Success,
        });
        assert!(step.keep_running);
        assert!(!core.is_idle());
    }

    #[test]
    fn shutdown_when_idle_exits_immediately() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Queue);
        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(!step.keep_running);
        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
    }

    #[test]
    fn shutdown_waits_for_in_flight_build() {
        let mut core = CoreRuntime::new(ChangesWhileBuilding::Queue);
        core.step(changed(&["a.scss"]));
        core.step(changed(&["b.scss"]));

        let step = core.step(RuntimeEvent::ShutdownRequested);
        assert!(step.keep_running);
        assert!(core.queue_is_empty());

        assert!(started(&core.step(changed(&["c.scss"]))).is_empty());

        let step = core.step(RuntimeEvent::BuildFinished {
            id: 1,
            outcome: BuildOutcome::Success,
        });
        assert!(!step.keep_running);
        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
    }
}
