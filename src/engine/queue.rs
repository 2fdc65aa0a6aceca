// src/engine/queue.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::types::ChangesWhileBuilding;

/// Changes that arrived while a build was running.
///
/// The pipeline always reprocesses the whole source tree, so no matter how
/// many change batches arrive during a build, at most one follow-up build is
/// ever owed. The queue therefore holds a single merged set of paths rather
/// than a list of batches.
#[derive(Debug)]
pub struct PendingChanges {
    behaviour: ChangesWhileBuilding,
    paths: BTreeSet<PathBuf>,
    owed: bool,
}

impl PendingChanges {
    pub fn new(behaviour: ChangesWhileBuilding) -> Self {
        Self {
            behaviour,
            paths: BTreeSet::new(),
            owed: false,
        }
    }

    pub fn behaviour(&self) -> ChangesWhileBuilding {
        self.behaviour
    }

    /// Returns true if no follow-up build is owed.
    pub fn is_empty(&self) -> bool {
        !self.owed
    }

    /// Record changes observed during a build.
    pub fn record(&mut self, paths: Vec<PathBuf>) {
        match self.behaviour {
            ChangesWhileBuilding::Queue => {
                let before = self.paths.len();
                self.paths.extend(paths);
                self.owed = true;
                debug!(
                    added = self.paths.len() - before,
                    total = self.paths.len(),
                    "merged changes into pending follow-up build"
                );
            }
            ChangesWhileBuilding::Discard => {
                debug!(count = paths.len(), "discarding changes that arrived during a build");
            }
        }
    }

    /// Take the owed follow-up build, if any, leaving the queue empty.
    pub fn take(&mut self) -> Option<Vec<PathBuf>> {
        if !self.owed {
            return None;
        }
        self.owed = false;
        Some(std::mem::take(&mut self.paths).into_iter().collect())
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.owed = false;
    }
}
