//! JSONL outbox adapter.
//!
//! Each request becomes one line in an append-only file. Another process (or
//! a later run) ships the lines to the remote store. Entries are read back
//! newest first.

use super::{SyncAdapter, SyncRequest};
use crate::error::SyncError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// One queued request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// ULID, sortable by creation time
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Canonical op string (e.g., "update-card")
    pub op: String,
    pub request: SyncRequest,
}

impl OutboxEntry {
    /// Create a new entry stamped now
    pub fn new(request: SyncRequest) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: request.op().to_string(),
            request,
        }
    }
}

/// Adapter that appends requests to a JSONL file
#[derive(Debug, Clone)]
pub struct OutboxSync {
    path: PathBuf,
}

impl OutboxSync {
    /// Create an outbox writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the outbox file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read queued entries, newest first
    pub async fn read(&self, limit: Option<usize>) -> Result<Vec<OutboxEntry>, SyncError> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let mut entries: Vec<OutboxEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }
}

#[async_trait]
impl SyncAdapter for OutboxSync {
    async fn apply(&self, request: &SyncRequest) -> Result<(), SyncError> {
        let entry = OutboxEntry::new(request.clone());
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
