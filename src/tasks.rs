// src/tasks.rs

//! The named entry points: `sass`, `watch`, `default` and `build`.
//!
//! Each task is a fixed sequence of [`Step`]s run against an explicit
//! [`ConfigFile`]; there is no global task registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ConfigFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::{Result, StylepipeError};
use crate::exec::PipelineBackend;
use crate::fs::FileSystem;
use crate::pipeline::{run_pipeline, BuildReport};
use crate::types::TaskName;
use crate::watch::{spawn_watcher, WatcherHandle};

/// One unit of work inside a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run the pipeline once.
    Compile,
    /// Watch the source directory until shutdown.
    Watch,
}

/// Steps making up `task`, in order.
pub fn steps(task: TaskName) -> &'static [Step] {
    match task {
        TaskName::Sass | TaskName::Build => &[Step::Compile],
        TaskName::Watch => &[Step::Watch],
        TaskName::Default => &[Step::Compile, Step::Watch],
    }
}

/// Run the pipeline once on the blocking pool.
pub async fn sass(cfg: Arc<ConfigFile>, fs: Arc<dyn FileSystem>) -> Result<BuildReport> {
    tokio::task::spawn_blocking(move || run_pipeline(&cfg, fs.as_ref()))
        .await
        .map_err(|e| StylepipeError::Other(anyhow!("build task failed: {e}")))?
}

/// Single-shot build for CI. Same as [`sass`].
pub async fn build(cfg: Arc<ConfigFile>, fs: Arc<dyn FileSystem>) -> Result<BuildReport> {
    sass(cfg, fs).await
}

/// A running watch loop.
///
/// Dropping the session stops the filesystem watcher; use
/// [`WatchSession::shutdown`] to also let an in-flight build finish.
#[derive(Debug)]
pub struct WatchSession {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    runtime: JoinHandle<Result<()>>,
    completed: Arc<AtomicUsize>,
    watcher: WatcherHandle,
}

impl WatchSession {
    /// Number of builds the watch loop has finished, successful or not.
    pub fn completed_builds(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn watcher(&self) -> &WatcherHandle {
        &self.watcher
    }

    /// A sender that can request shutdown from another task.
    pub fn shutdown_sender(&self) -> mpsc::Sender<RuntimeEvent> {
        self.runtime_tx.clone()
    }

    /// Request a graceful shutdown and wait for the runtime to stop.
    pub async fn shutdown(self) -> Result<()> {
        // A closed channel means the runtime already stopped.
        let _ = self.runtime_tx.send(RuntimeEvent::ShutdownRequested).await;
        self.wait().await
    }

    /// Wait until the runtime stops.
    pub async fn wait(self) -> Result<()> {
        let WatchSession {
            runtime, watcher, ..
        } = self;
        let result = runtime
            .await
            .map_err(|e| StylepipeError::Other(anyhow!("watch runtime failed: {e}")))?;
        drop(watcher);
        result
    }
}

/// Start the watcher and its runtime without blocking.
pub async fn start_watch(cfg: Arc<ConfigFile>, fs: Arc<dyn FileSystem>) -> Result<WatchSession> {
    let (runtime_tx, runtime_rx) = mpsc::channel::<RuntimeEvent>(64);

    let backend = PipelineBackend::new(Arc::clone(&cfg), Arc::clone(&fs), runtime_tx.clone());
    let completed = backend.completed_counter();

    let watcher = spawn_watcher(&cfg, fs, runtime_tx.clone())?;

    let core = CoreRuntime::new(cfg.watch.changes_while_building);
    let runtime = tokio::spawn(Runtime::new(core, runtime_rx, backend).run());

    Ok(WatchSession {
        runtime_tx,
        runtime,
        completed,
        watcher,
    })
}

/// Watch until Ctrl-C.
pub async fn watch(cfg: Arc<ConfigFile>, fs: Arc<dyn FileSystem>) -> Result<()> {
    let session = start_watch(cfg, fs).await?;

    // Ctrl-C → graceful shutdown.
    let tx = session.shutdown_sender();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });

    info!("watching for changes; press Ctrl+C to stop");
    session.wait().await
}

/// Run every step of `task`.
///
/// A failed compile ends the task with its error unless a watch step
/// follows, in which case it is logged and watching starts anyway.
pub async fn run_task(task: TaskName, cfg: Arc<ConfigFile>, fs: Arc<dyn FileSystem>) -> Result<()> {
    let steps = steps(task);
    info!(task = %task, ?steps, "running task");

    for (idx, step) in steps.iter().enumerate() {
        let watch_follows = steps[idx + 1..].contains(&Step::Watch);
        match step {
            Step::Compile => match sass(Arc::clone(&cfg), Arc::clone(&fs)).await {
                Ok(_) => {}
                Err(err) if watch_follows => {
                    if !err.is_source_error() {
                        error!("initial build failed: {err}");
                    }
                    warn!("initial build failed; watching anyway");
                }
                Err(err) => return Err(err),
            },
            Step::Watch => watch(Arc::clone(&cfg), Arc::clone(&fs)).await?,
        }
    }

    Ok(())
}
