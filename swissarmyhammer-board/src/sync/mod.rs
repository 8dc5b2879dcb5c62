//! Persistence seam.
//!
//! The move engine reports which entities need a remote update as a list of
//! [`SyncRequest`]s. A [`SyncAdapter`] turns those into remote calls. Dispatch
//! is fire-and-forget: the caller never waits for it, failures are logged and
//! the optimistic local state stands. There is no retry and no rollback.

mod outbox;

pub use outbox::{OutboxEntry, OutboxSync};

use crate::error::SyncError;
use crate::types::{Card, CardId, Column, ColumnId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

/// A remote update for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum SyncRequest {
    /// `update-column(id, { position })`
    UpdateColumn { id: ColumnId, position: usize },
    /// `update-card(id, { title, textDescription, columnId, position })`
    UpdateCard {
        id: CardId,
        title: String,
        #[serde(rename = "textDescription")]
        text_description: String,
        #[serde(rename = "columnId")]
        column_id: ColumnId,
        position: usize,
    },
}

impl SyncRequest {
    /// Update request for a column's position
    pub fn for_column(column: &Column) -> Self {
        Self::UpdateColumn {
            id: column.id,
            position: column.position,
        }
    }

    /// Update request carrying a card's editable fields and placement
    pub fn for_card(card: &Card) -> Self {
        Self::UpdateCard {
            id: card.id,
            title: card.title.clone(),
            text_description: card.text_description.clone(),
            column_id: card.column_id,
            position: card.position,
        }
    }

    /// Canonical op string
    pub fn op(&self) -> &'static str {
        match self {
            Self::UpdateColumn { .. } => "update-column",
            Self::UpdateCard { .. } => "update-card",
        }
    }

    /// The update payload, without the entity id
    pub fn body(&self) -> Value {
        match self {
            Self::UpdateColumn { position, .. } => json!({ "position": position }),
            Self::UpdateCard {
                title,
                text_description,
                column_id,
                position,
                ..
            } => json!({
                "title": title,
                "textDescription": text_description,
                "columnId": column_id,
                "position": position,
            }),
        }
    }
}

/// Something that can push entity updates to the remote store
#[async_trait]
pub trait SyncAdapter: Send + Sync {
    /// Apply one update
    async fn apply(&self, request: &SyncRequest) -> Result<(), SyncError>;
}

enum Job {
    Apply(Vec<SyncRequest>),
    Flush(oneshot::Sender<()>),
}

/// Pushes batches to an adapter on a single background worker.
///
/// Batches are applied strictly in submission order, so a later move's
/// update for an entity always lands after an earlier one. The worker is
/// spawned on the first submission and stops once the queue is dropped and
/// its backlog is drained. Failures are logged and the remaining requests
/// are still attempted.
pub struct SyncQueue {
    adapter: Arc<dyn SyncAdapter>,
    sender: Option<mpsc::UnboundedSender<Job>>,
}

impl SyncQueue {
    /// Queue for `adapter`; no worker runs until the first batch arrives
    pub fn new(adapter: Arc<dyn SyncAdapter>) -> Self {
        Self {
            adapter,
            sender: None,
        }
    }

    /// Queue a batch behind everything submitted before it. Must be called
    /// from inside a tokio runtime.
    pub fn submit(&mut self, requests: Vec<SyncRequest>) {
        if requests.is_empty() {
            return;
        }
        self.send(Job::Apply(requests));
    }

    /// Wait until every batch submitted so far has been attempted
    pub async fn flush(&mut self) {
        if self.sender.is_none() {
            return;
        }
        let (done, finished) = oneshot::channel();
        self.send(Job::Flush(done));
        if finished.await.is_err() {
            warn!("sync worker stopped before flushing");
        }
    }

    fn send(&mut self, job: Job) {
        let adapter = &self.adapter;
        let sender = self
            .sender
            .get_or_insert_with(|| spawn_worker(adapter.clone()));
        if let Err(mpsc::error::SendError(job)) = sender.send(job) {
            warn!("sync worker stopped; restarting");
            let sender = spawn_worker(self.adapter.clone());
            if sender.send(job).is_err() {
                warn!("sync worker refused a batch");
            }
            self.sender = Some(sender);
        }
    }
}

fn spawn_worker(adapter: Arc<dyn SyncAdapter>) -> mpsc::UnboundedSender<Job> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            match job {
                Job::Apply(requests) => apply_batch(adapter.as_ref(), &requests).await,
                Job::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("sync worker stopped");
    });
    sender
}

async fn apply_batch(adapter: &dyn SyncAdapter, requests: &[SyncRequest]) {
    for request in requests {
        match adapter.apply(request).await {
            Ok(()) => debug!(op = request.op(), "synced"),
            Err(e) => warn!(op = request.op(), error = %e, "sync failed; local state kept"),
        }
    }
}

/// In-memory adapter that records every request it sees
#[derive(Debug, Default)]
pub struct RecordingSync {
    requests: Mutex<Vec<SyncRequest>>,
    fail: bool,
}

impl RecordingSync {
    /// Adapter that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter that records, then reports a remote failure for every request
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Requests seen so far, oldest first
    pub async fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl SyncAdapter for RecordingSync {
    async fn apply(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.requests.lock().await.push(request.clone());
        if self.fail {
            return Err(SyncError::remote(request.op(), "rejected by test adapter"));
        }
        Ok(())
    }
}
