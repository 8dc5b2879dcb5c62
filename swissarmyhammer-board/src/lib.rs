//! Board ordering engine for a kanban-style task tracker
//!
//! This crate keeps the ordering of a board's columns and of the cards inside
//! each column consistent while the user drags things around, and tells a
//! remote store which entities changed.
//!
//! ## Overview
//!
//! - **Pure moves** - [`MoveEngine`] turns a drag-end [`MoveIntent`] into a new
//!   [`BoardState`] plus the list of [`SyncRequest`]s to push; the input state
//!   is never mutated
//! - **Contiguous positions** - every column list and every card list is
//!   numbered `0..n-1` after any operation
//! - **Optimistic sync** - the new state is installed immediately and pushed
//!   through a [`SyncAdapter`] in the background; failures are logged, never
//!   rolled back
//! - **Derived views** - [`FilterPredicate`] projects the visible cards and
//!   [`Selection`] keeps the open card pointing at live data
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swissarmyhammer_board::{
//!     snapshot, BoardSession, MoveIntent, MoveReport, RecordingSync,
//! };
//!
//! # async fn example(body: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let state = snapshot::hydrate(snapshot::BoardResponse::from_json(body)?)?;
//! let mut session = BoardSession::new(state, Arc::new(RecordingSync::new()));
//!
//! // Card "c-1" dragged from slot 0 of column "todo" to slot 2 of "doing"
//! let intent = MoveIntent::card("c-1", ("todo", 0), ("doing", 2));
//! let report = session.handle_drag_end(Some(intent));
//! if let MoveReport::Applied { changes, .. } = report {
//!     println!("{} entities to sync", changes.len());
//! }
//! session.flush().await;
//! # Ok(())
//! # }
//! ```

pub mod auto_color;
pub mod config;
mod error;
pub mod filter;
pub mod moves;
pub mod ordered;
pub mod selection;
pub mod session;
pub mod snapshot;
mod state;
pub mod sync;
pub mod types;

pub use config::BoardConfig;
pub use error::{BoardError, ConfigError, Result, SyncError};
pub use filter::{FilterMode, FilterPredicate};
pub use moves::{MoveCard, MoveColumn, MoveEngine, MoveIntent, MoveKind, MoveOutcome, PersistPolicy};
pub use selection::{Selection, SelectionChange};
pub use session::{BoardSession, MoveReport, Notification};
pub use state::BoardState;
pub use sync::{OutboxEntry, OutboxSync, RecordingSync, SyncAdapter, SyncQueue, SyncRequest};

// Re-export commonly used types
pub use types::{
    Board, BoardId, Card, CardId, CardPatch, Column, ColumnId, Comment, CommentId, DragId, Label,
    LabelId, MemberId,
};
