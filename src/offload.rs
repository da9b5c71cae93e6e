//! Background ranking for large catalogues.
//!
//! Each submission aborts the previous in-flight task. Aborting cannot stop a
//! ranking pass that already started on the blocking pool, so an old outcome
//! may still arrive; [`Palette::apply`](crate::controller::Palette::apply)
//! rejects it by generation.

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::{RankOutcome, RankRequest};
use crate::error::PaletteError;

/// Run a single request on the blocking pool.
pub async fn rank_in_background(request: RankRequest) -> Result<RankOutcome, PaletteError> {
    Ok(tokio::task::spawn_blocking(move || request.run()).await?)
}

pub struct BackgroundRanker {
    handle: Handle,
    tx: mpsc::UnboundedSender<RankOutcome>,
    rx: mpsc::UnboundedReceiver<RankOutcome>,
    inflight: Option<JoinHandle<()>>,
}

impl BackgroundRanker {
    pub fn new(handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            tx,
            rx,
            inflight: None,
        }
    }

    pub fn submit(&mut self, request: RankRequest) {
        if let Some(prev) = self.inflight.take() {
            prev.abort();
        }
        debug!(generation = request.generation(), query = request.query(), "ranking in background");
        let tx = self.tx.clone();
        self.inflight = Some(self.handle.spawn(async move {
            match rank_in_background(request).await {
                Ok(outcome) => {
                    let _ = tx.send(outcome);
                }
                Err(e) => debug!(error = %e, "background ranking did not complete"),
            }
        }));
    }

    /// Whether a submitted task has not yet finished.
    pub fn is_busy(&self) -> bool {
        self.inflight.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Non-blocking poll for the next finished outcome.
    pub fn try_recv(&mut self) -> Option<RankOutcome> {
        self.rx.try_recv().ok()
    }
}
