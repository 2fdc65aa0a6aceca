// src/watch/event_filter.rs

//! Event classification for filesystem notifications.

use std::path::PathBuf;

use notify::event::{MetadataKind, ModifyKind};
use notify::{Event, EventKind};

use crate::watch::patterns::WatchProfile;

/// Create, modify and remove events count; reads (`Access`) and access-time
/// updates do not, otherwise the pipeline reading its own sources would
/// re-trigger itself.
pub fn is_relevant_kind(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => true,
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) | EventKind::Other => false,
    }
}

/// Paths of `event` that belong to the watched source set.
pub fn relevant_paths(event: &Event, profile: &WatchProfile) -> Vec<PathBuf> {
    if !is_relevant_kind(&event.kind) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter(|p| profile.matches(p))
        .cloned()
        .collect()
}
