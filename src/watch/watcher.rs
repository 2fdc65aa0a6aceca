// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::event_filter::relevant_paths;
use crate::watch::hash::{compute_source_digest, DigestGate};
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    root: PathBuf,
}

impl WatcherHandle {
    /// Absolute directory being watched.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish()
    }
}

/// Spawn a filesystem watcher on the source directory that sends
/// `RuntimeEvent::SourcesChanged` whenever a path of the source set changes.
///
/// Bursts of events are coalesced over `watch.debounce_ms`. With
/// `watch.use_hash`, a trigger whose source digest matches the previous one
/// is dropped.
pub fn spawn_watcher(
    cfg: &ConfigFile,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let profile = WatchProfile::from_config(cfg)?;
    let root = profile.root().to_path_buf();

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("stylepipe: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("stylepipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    let settle = Duration::from_millis(cfg.watch.debounce_ms);
    let hash_cfg = cfg.watch.use_hash.then(|| Arc::new(cfg.clone()));

    tokio::spawn(async move {
        let mut gate = match &hash_cfg {
            Some(cfg) => Some(DigestGate::new(digest_of(cfg, &fs).await)),
            None => None,
        };

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let mut paths = relevant_paths(&event, &profile);
            if paths.is_empty() {
                continue;
            }

            if !settle.is_zero() {
                let deadline = Instant::now() + settle;
                while let Ok(Some(next)) = timeout_at(deadline, event_rx.recv()).await {
                    paths.extend(relevant_paths(&next, &profile));
                }
            }

            paths.sort();
            paths.dedup();

            if let (Some(gate), Some(cfg)) = (gate.as_mut(), hash_cfg.as_ref()) {
                // An unreadable source set still triggers a build so the
                // pipeline can surface the error.
                if let Some(digest) = digest_of(cfg, &fs).await {
                    if !gate.admit(digest) {
                        continue;
                    }
                }
            }

            info!(count = paths.len(), "source change detected");
            if runtime_tx
                .send(RuntimeEvent::SourcesChanged { paths })
                .await
                .is_err()
            {
                debug!("runtime channel closed; stopping watcher forwarder");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        root,
    })
}

async fn digest_of(cfg: &Arc<ConfigFile>, fs: &Arc<dyn FileSystem>) -> Option<String> {
    let cfg = Arc::clone(cfg);
    let fs = Arc::clone(fs);
    match tokio::task::spawn_blocking(move || compute_source_digest(fs.as_ref(), &cfg)).await {
        Ok(Ok(digest)) => Some(digest),
        Ok(Err(err)) => {
            warn!("failed to hash source set: {err:#}");
            None
        }
        Err(err) => {
            warn!("hashing task failed: {err}");
            None
        }
    }
}
