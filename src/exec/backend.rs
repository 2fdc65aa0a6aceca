// src/exec/backend.rs

//! Pluggable build backend abstraction.
//!
//! The runtime talks to a `BuildBackend` instead of running the pipeline
//! itself. This makes it easy to swap in a fake backend in tests.
//!
//! - `PipelineBackend` is the production implementation: it runs
//!   [`run_pipeline`] on the blocking pool.
//! - Tests can provide their own `BuildBackend` that, for example, records
//!   requests and directly emits `BuildFinished` events.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::ConfigFile;
use crate::engine::{BuildOutcome, BuildRequest, RuntimeEvent};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::run_pipeline;

/// Trait abstracting how builds are executed.
pub trait BuildBackend: Send {
    /// Start the given build. The implementation must eventually send
    /// `RuntimeEvent::BuildFinished` carrying `request.id`.
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend running the style pipeline.
pub struct PipelineBackend {
    config: Arc<ConfigFile>,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    completed: Arc<AtomicUsize>,
}

impl PipelineBackend {
    pub fn new(
        config: Arc<ConfigFile>,
        fs: Arc<dyn FileSystem>,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            config,
            fs,
            runtime_tx,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of finished builds, successful or not.
    pub fn completed_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.completed)
    }
}

impl BuildBackend for PipelineBackend {
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let config = Arc::clone(&self.config);
        let fs = Arc::clone(&self.fs);
        let tx = self.runtime_tx.clone();
        let completed = Arc::clone(&self.completed);

        Box::pin(async move {
            tokio::spawn(async move {
                let id = request.id;
                let joined =
                    tokio::task::spawn_blocking(move || run_pipeline(&config, fs.as_ref())).await;

                let outcome = match joined {
                    Ok(Ok(report)) => {
                        info!(id, compiled = report.compiled, "rebuild complete");
                        BuildOutcome::Success
                    }
                    // Compile and bundle errors were already logged with
                    // their file context by the pipeline.
                    Ok(Err(err)) if err.is_source_error() => BuildOutcome::Failed,
                    Ok(Err(err)) => {
                        error!(id, "rebuild failed: {err}");
                        BuildOutcome::Failed
                    }
                    Err(err) => {
                        error!(id, "build task panicked or was cancelled: {err}");
                        BuildOutcome::Failed
                    }
                };

                completed.fetch_add(1, Ordering::SeqCst);
                if tx
                    .send(RuntimeEvent::BuildFinished { id, outcome })
                    .await
                    .is_err()
                {
                    warn!(id, "runtime gone before build completion could be reported");
                }
            });
            Ok(())
        })
    }
}
