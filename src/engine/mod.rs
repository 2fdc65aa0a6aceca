// src/engine/mod.rs

//! Orchestration engine for the watch loop.
//!
//! This module ties together:
//! - the pending-changes queue (what happens when changes arrive while a
//!   build is running)
//! - the main runtime event loop that reacts to:
//!   - source changes from the watcher
//!   - build completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`]. At most one build is in flight at any time.

use std::path::PathBuf;

/// Identifier of a single pipeline run, unique within a runtime.
pub type BuildId = u64;

/// Outcome of a pipeline run as seen by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed,
}

/// Events flowing into the runtime from the watcher, the build backend and
/// the signal handler.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// One or more paths of the source set changed (already coalesced).
    SourcesChanged { paths: Vec<PathBuf> },
    /// A build started by the runtime has finished.
    BuildFinished { id: BuildId, outcome: BuildOutcome },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// A build the core wants the IO shell to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub id: BuildId,
    /// Paths whose changes led to this build, sorted and deduplicated.
    pub changed: Vec<PathBuf>,
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use crate::types::ChangesWhileBuilding;
pub use core::CoreRuntime;
pub use event_handlers::{BuildSlot, CoreCommand, CoreStep};
pub use queue::PendingChanges;
pub use runtime::Runtime;
