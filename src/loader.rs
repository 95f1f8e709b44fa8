// SPDX-License-Identifier: MPL-2.0
//! Background decoding with speculative, exclusive and blocking submission.
//!
//! Decodes run on Tokio's blocking pool, gated by a semaphore sized to the
//! configured number of decode workers. Completions are delivered as
//! [`LoaderEvent`]s through the orchestrator's channel.
//!
//! Cancellation is best-effort: a load that has not started decoding is
//! dropped silently, but a decode that is already running finishes on its
//! worker. Receivers must tolerate completions for paths they no longer care
//! about.

use crate::application::port::ImageDecoder;
use crate::error::{Error, Result};
use crate::media::Image;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::AbortHandle;

/// Completion notifications emitted by the [`Loader`].
#[derive(Debug)]
pub enum LoaderEvent {
    /// A non-blocking load finished. Ownership of the image moves to the receiver.
    Finished { path: PathBuf, result: Result<Image> },
}

#[derive(Debug)]
struct PendingLoad {
    id: u64,
    handle: AbortHandle,
}

#[derive(Debug, Default)]
struct PendingLoads {
    next_id: u64,
    by_path: HashMap<PathBuf, PendingLoad>,
}

/// Asynchronous decode worker.
///
/// Generic over the channel message type so it can feed any event loop
/// whose message converts from [`LoaderEvent`].
pub struct Loader<M> {
    decoder: Arc<dyn ImageDecoder>,
    runtime: Handle,
    events: mpsc::UnboundedSender<M>,
    permits: Arc<Semaphore>,
    pending: Arc<Mutex<PendingLoads>>,
}

impl<M> Loader<M>
where
    M: From<LoaderEvent> + Send + 'static,
{
    /// Creates a loader with `workers` concurrent decodes (at least one).
    pub fn new(
        decoder: Arc<dyn ImageDecoder>,
        runtime: Handle,
        events: mpsc::UnboundedSender<M>,
        workers: usize,
    ) -> Self {
        Self {
            decoder,
            runtime,
            events,
            permits: Arc::new(Semaphore::new(workers.max(1))),
            pending: Arc::new(Mutex::new(PendingLoads::default())),
        }
    }

    /// Speculative decode. Never cancels other work; a path that is already
    /// queued or decoding is not submitted twice.
    pub fn load(&self, path: &Path) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.by_path.contains_key(path) {
            tracing::trace!(path = %path.display(), "load already pending");
            return;
        }
        self.spawn_load(&mut pending, path.to_path_buf());
    }

    /// Decode that supersedes every other pending non-blocking load.
    pub fn load_exclusive(&self, path: &Path) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let superseded: Vec<PendingLoad> = pending
            .by_path
            .extract_if(|pending_path, _| pending_path.as_path() != path)
            .map(|(pending_path, load)| {
                tracing::debug!(path = %pending_path.display(), "superseded by exclusive load");
                load
            })
            .collect();
        abort_newest_first(superseded);
        if !pending.by_path.contains_key(path) {
            self.spawn_load(&mut pending, path.to_path_buf());
        }
    }

    /// Decodes synchronously on the calling thread, bypassing the event channel.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the file cannot be decoded.
    pub fn load_blocking(&self, path: &Path) -> Result<Image> {
        self.decoder.decode(path)
    }

    /// Cancels all pending non-blocking loads without waiting.
    pub fn clear_tasks(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        abort_newest_first(pending.by_path.drain().map(|(_, load)| load).collect());
    }

    /// Number of loads queued or decoding.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .len()
    }

    /// Returns `true` if a load for `path` is queued or decoding.
    #[must_use]
    pub fn is_pending(&self, path: &Path) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .contains_key(path)
    }

    // Called with the pending map locked so the task cannot finish and
    // deregister before it has been registered.
    fn spawn_load(&self, pending: &mut PendingLoads, path: PathBuf) {
        let id = pending.next_id;
        pending.next_id += 1;

        let decoder = self.decoder.clone();
        let permits = self.permits.clone();
        let registry = self.pending.clone();
        let events = self.events.clone();
        let task_path = path.clone();

        let task = self.runtime.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let decode_path = task_path.clone();
            let result = tokio::task::spawn_blocking(move || decoder.decode(&decode_path))
                .await
                .unwrap_or_else(|e| Err(Error::Decode(format!("Decode task failed: {e}"))));

            {
                let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
                if registry
                    .by_path
                    .get(&task_path)
                    .is_some_and(|load| load.id == id)
                {
                    registry.by_path.remove(&task_path);
                }
            }

            if let Err(e) = &result {
                tracing::warn!(path = %task_path.display(), error = %e, "decode failed");
            }
            let event = LoaderEvent::Finished {
                path: task_path,
                result,
            };
            if events.send(M::from(event)).is_err() {
                tracing::trace!("loader event dropped: receiver closed");
            }
        });

        tracing::debug!(path = %path.display(), id, "load submitted");
        pending.by_path.insert(
            path,
            PendingLoad {
                id,
                handle: task.abort_handle(),
            },
        );
    }
}

// Loads waiting for a permit are newer than the ones holding one; aborting
// them first keeps a released permit from waking a load that is about to be
// aborted.
fn abort_newest_first(mut loads: Vec<PendingLoad>) {
    loads.sort_by(|a, b| b.id.cmp(&a.id));
    for load in loads {
        load.handle.abort();
    }
}

impl<M> std::fmt::Debug for Loader<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pending = self
            .pending
            .lock()
            .map(|pending| pending.by_path.len())
            .unwrap_or_default();
        f.debug_struct("Loader")
            .field("available_workers", &self.permits.available_permits())
            .field("pending", &pending)
            .finish()
    }
}
