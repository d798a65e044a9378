//! Background render jobs.
//!
//! A batch blocks on external processes for its whole run, so it lives on
//! tokio's blocking pool. Progress is forwarded over an unbounded channel;
//! the caller polls it while awaiting [`RenderHandle::wait`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use vibe_common::error::{VibeError, VibeResult};
use vibe_render_model::{RenderBatchResult, RenderProgress};

use crate::backend::RenderBackend;
use crate::orchestrator::{CancelFlag, RenderOrchestrator, RenderRequest};

/// A running batch.
pub struct RenderHandle {
    pub progress: mpsc::UnboundedReceiver<RenderProgress>,
    cancel: CancelFlag,
    join: JoinHandle<VibeResult<RenderBatchResult>>,
}

impl RenderHandle {
    /// Request cancellation. Takes effect before the next segment or
    /// before combination.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Wait for the batch to finish.
    pub async fn wait(self) -> VibeResult<RenderBatchResult> {
        match self.join.await {
            Ok(result) => result,
            Err(err) => Err(VibeError::Other(anyhow::anyhow!(
                "render worker terminated: {err}"
            ))),
        }
    }
}

/// Start `request` on the blocking pool. Must be called inside a tokio
/// runtime.
pub fn spawn_render<B>(backend: B, request: RenderRequest) -> RenderHandle
where
    B: RenderBackend + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let cancel = CancelFlag::new();
    let orchestrator = RenderOrchestrator::new(backend).with_cancel_flag(cancel.clone());

    let join = tokio::task::spawn_blocking(move || {
        let progress = Box::new(move |update: RenderProgress| {
            // The receiver may already be gone; the batch keeps running.
            let _ = tx.send(update);
        });
        orchestrator.run(&request, Some(progress))
    });

    RenderHandle {
        progress: rx,
        cancel,
        join,
    }
}
