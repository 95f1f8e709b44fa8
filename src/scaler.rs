// SPDX-License-Identifier: MPL-2.0
//! Background scaling of the displayed image.
//!
//! Requests go through a `watch` channel, so a request that is still
//! waiting when a newer one arrives is superseded. Staleness of completed
//! results is not decided here: each result carries its original request
//! and the orchestrator compares `request.path` with the path of the
//! currently selected file.

use crate::error::{Error, Result};
use crate::media::{image_transform, Image, ImageData};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

/// A resize of one image for one navigation target.
#[derive(Debug, Clone)]
pub struct ScaleRequest {
    /// The image to scale. Holding it keeps the pixels alive if the cache
    /// evicts the entry meanwhile.
    pub image: Arc<Image>,
    pub width: u32,
    pub height: u32,
    /// Path of the file selected when the request was issued.
    pub path: PathBuf,
}

impl ScaleRequest {
    #[must_use]
    pub fn new(image: Arc<Image>, (width, height): (u32, u32), path: PathBuf) -> Self {
        Self {
            image,
            width,
            height,
            path,
        }
    }
}

/// Completion notifications emitted by the [`Scaler`].
#[derive(Debug)]
pub enum ScalerEvent {
    Finished {
        request: ScaleRequest,
        result: Result<ImageData>,
    },
}

/// Asynchronous resize worker.
pub struct Scaler {
    requests: watch::Sender<Option<ScaleRequest>>,
}

impl Scaler {
    /// Spawns the scaling worker on `runtime`.
    ///
    /// The worker stops when the scaler is dropped or the event receiver closes.
    pub fn new<M>(runtime: &Handle, events: mpsc::UnboundedSender<M>) -> Self
    where
        M: From<ScalerEvent> + Send + 'static,
    {
        let (requests, mut rx) = watch::channel::<Option<ScaleRequest>>(None);

        runtime.spawn(async move {
            while rx.changed().await.is_ok() {
                let Some(request) = rx.borrow_and_update().clone() else {
                    continue;
                };
                let job = request.clone();
                let result = tokio::task::spawn_blocking(move || scale_request(&job))
                    .await
                    .unwrap_or_else(|e| Err(Error::Decode(format!("Scale task failed: {e}"))));

                if events
                    .send(M::from(ScalerEvent::Finished { request, result }))
                    .is_err()
                {
                    break;
                }
            }
            tracing::trace!("scaler worker stopped");
        });

        Self { requests }
    }

    /// Queues `request`, replacing any request that has not started yet.
    pub fn request_scaled(&self, request: ScaleRequest) {
        tracing::trace!(
            path = %request.path.display(),
            width = request.width,
            height = request.height,
            "scale requested"
        );
        self.requests.send_replace(Some(request));
    }
}

impl std::fmt::Debug for Scaler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scaler")
            .field("has_pending", &self.requests.borrow().is_some())
            .finish()
    }
}

/// Scales the request's current frame to the requested size.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEdit`] for media without a still frame (video).
pub fn scale_request(request: &ScaleRequest) -> Result<ImageData> {
    let frame = request
        .image
        .current_frame()
        .ok_or(Error::UnsupportedEdit(request.image.kind()))?;
    image_transform::scale(&frame, request.width, request.height)
}
