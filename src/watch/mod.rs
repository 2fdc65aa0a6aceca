// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which filesystem events concern the source set (`patterns`,
//!   `event_filter`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) and coalescing
//!   bursts of events into single triggers (`watcher`).
//! - Optionally hashing the source set so content-neutral events (touch,
//!   save without edits) don't cause rebuilds (`hash`).
//!
//! It does **not** run the pipeline; it only turns filesystem changes into
//! `RuntimeEvent::SourcesChanged`.

pub mod event_filter;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use hash::{compute_file_hash, compute_source_digest, DigestGate};
pub use patterns::WatchProfile;
pub use watcher::{spawn_watcher, WatcherHandle};
