//! Background preview generation.
//!
//! Workers run on tokio's blocking pool and never see the catalog. Each
//! finished preview travels back to the owner over an unbounded channel;
//! the owner applies it with [`Catalog::apply_preview`](crate::catalog::Catalog::apply_preview).

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::task;

use super::{PagePreview, PreviewKey, PreviewRenderer, PreviewRequest};

/// Message sent from a preview worker to the owner.
#[derive(Debug, Clone)]
pub enum PreviewEvent {
    /// A preview is ready to be applied.
    Ready(PagePreview),
    /// The worker itself died; the page keeps no preview.
    Failed {
        /// Page that was being rendered.
        key: PreviewKey,
        /// What happened.
        reason: String,
    },
}

/// Renders previews with bounded concurrency.
#[derive(Debug, Clone)]
pub struct PreviewQueue {
    renderer: PreviewRenderer,
    workers: usize,
}

impl PreviewQueue {
    /// Create a queue using the renderer's worker setting.
    pub fn new(renderer: PreviewRenderer) -> Self {
        let workers = renderer.options().effective_workers();
        Self::with_workers(renderer, workers)
    }

    /// Create a queue with an explicit number of workers.
    pub fn with_workers(renderer: PreviewRenderer, workers: usize) -> Self {
        Self {
            renderer,
            workers: workers.max(1),
        }
    }

    /// Number of concurrent workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start rendering `requests` and return the receiving end of the
    /// event channel. Events arrive in completion order, not request order.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, requests: Vec<PreviewRequest>) -> mpsc::UnboundedReceiver<PreviewEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let renderer = self.renderer.clone();
        let workers = self.workers;

        tracing::debug!(pages = requests.len(), workers, "starting preview queue");

        tokio::spawn(async move {
            let tasks = requests.into_iter().map(|request| {
                let renderer = renderer.clone();
                async move {
                    let key = request.key.clone();
                    match task::spawn_blocking(move || renderer.render(&request)).await {
                        Ok(preview) => PreviewEvent::Ready(preview),
                        Err(err) => PreviewEvent::Failed {
                            key,
                            reason: err.to_string(),
                        },
                    }
                }
            });

            let mut events = stream::iter(tasks).buffer_unordered(workers);
            while let Some(event) = events.next().await {
                if tx.send(event).is_err() {
                    tracing::debug!("preview receiver dropped, stopping queue");
                    break;
                }
            }
        });

        rx
    }

    /// Render everything and wait for all events.
    pub async fn run(&self, requests: Vec<PreviewRequest>) -> Vec<PreviewEvent> {
        let mut rx = self.spawn(requests);
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }
}
