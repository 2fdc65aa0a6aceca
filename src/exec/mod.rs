// src/exec/mod.rs

//! Build execution layer.
//!
//! The runtime never calls the pipeline directly; it hands a
//! [`BuildRequest`](crate::engine::BuildRequest) to a [`BuildBackend`],
//! which runs it and later reports `RuntimeEvent::BuildFinished`.
//!
//! - [`backend`] provides the `BuildBackend` trait and the production
//!   `PipelineBackend`, which tests can replace with a fake implementation.

pub mod backend;

pub use backend::{BuildBackend, PipelineBackend};
