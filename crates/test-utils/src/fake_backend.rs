use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stylepipe::engine::{BuildOutcome, BuildRequest, RuntimeEvent};
use stylepipe::errors::Result;
use stylepipe::exec::BuildBackend;
use tokio::sync::mpsc;

/// A fake backend that:
/// - records every build request it receives
/// - immediately reports `BuildFinished` with a fixed outcome.
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<Mutex<Vec<BuildRequest>>>,
    outcome: BuildOutcome,
}

impl FakeBackend {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        started: Arc<Mutex<Vec<BuildRequest>>>,
    ) -> Self {
        Self {
            runtime_tx,
            started,
            outcome: BuildOutcome::Success,
        }
    }

    /// Report every build as failed.
    pub fn failing(mut self) -> Self {
        self.outcome = BuildOutcome::Failed;
        self
    }
}

impl BuildBackend for FakeBackend {
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let started = Arc::clone(&self.started);
        let outcome = self.outcome;

        Box::pin(async move {
            let id = request.id;
            started.lock().unwrap().push(request);

            tx.send(RuntimeEvent::BuildFinished { id, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}
