//! Move engine.
//!
//! A drag-end event is described by a [`MoveIntent`]. The engine resolves it
//! to a [`MoveColumn`] or [`MoveCard`] command, computes the new state, and
//! reports which entities must be pushed to the remote store. Nothing here
//! mutates the input state; a rejected move leaves the caller holding exactly
//! what it had.

mod card;
mod column;

pub use card::MoveCard;
pub use column::MoveColumn;

use crate::error::Result;
use crate::state::BoardState;
use crate::sync::SyncRequest;
use crate::types::{CardId, ColumnId, DragId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Droppable id of the board-level column strip
pub const BOARD_DROPPABLE: &str = "board";

/// What was dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Column,
    Card,
}

/// A completed drag gesture, as reported by the drag surface.
///
/// Containers and the dragged item are named by drag id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveIntent {
    pub kind: MoveKind,
    pub source_container_id: DragId,
    pub destination_container_id: DragId,
    pub source_index: usize,
    pub destination_index: usize,
    pub dragged_item_id: DragId,
}

impl MoveIntent {
    /// Column drag along the board strip
    pub fn column(dragged: impl Into<DragId>, from_index: usize, to_index: usize) -> Self {
        Self {
            kind: MoveKind::Column,
            source_container_id: DragId::from(BOARD_DROPPABLE),
            destination_container_id: DragId::from(BOARD_DROPPABLE),
            source_index: from_index,
            destination_index: to_index,
            dragged_item_id: dragged.into(),
        }
    }

    /// Card drag from one column slot to another
    pub fn card(
        dragged: impl Into<DragId>,
        from: (impl Into<DragId>, usize),
        to: (impl Into<DragId>, usize),
    ) -> Self {
        Self {
            kind: MoveKind::Card,
            source_container_id: from.0.into(),
            destination_container_id: to.0.into(),
            source_index: from.1,
            destination_index: to.1,
            dragged_item_id: dragged.into(),
        }
    }

    /// Dropped back where it started
    pub fn is_noop(&self) -> bool {
        self.source_container_id == self.destination_container_id
            && self.source_index == self.destination_index
    }
}

/// Which entities a move reports for persistence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistPolicy {
    /// Only the dragged entity. Siblings shifted locally are not sent.
    #[default]
    MovedOnly,
    /// Every column or card whose position or parent changed, dragged entity first
    AllChanged,
}

/// Result of applying a move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The state to install
    pub state: BoardState,
    /// Remote updates to dispatch, in order
    pub changes: Vec<SyncRequest>,
    noop: bool,
}

impl MoveOutcome {
    fn unchanged(state: &BoardState) -> Self {
        Self {
            state: state.clone(),
            changes: Vec::new(),
            noop: true,
        }
    }

    /// True when nothing moved and nothing needs persisting
    pub fn is_noop(&self) -> bool {
        self.noop
    }
}

/// Applies move intents under a persistence policy
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveEngine {
    policy: PersistPolicy,
}

impl MoveEngine {
    /// Create an engine with the given policy
    pub fn new(policy: PersistPolicy) -> Self {
        Self { policy }
    }

    /// The persistence policy in force
    pub fn policy(&self) -> PersistPolicy {
        self.policy
    }

    /// Apply a move intent to `state`.
    ///
    /// Returns `Err` with a not-found error when the column, container or card
    /// named by the intent does not resolve; `state` is untouched either way.
    pub fn apply(&self, state: &BoardState, intent: &MoveIntent) -> Result<MoveOutcome> {
        if intent.is_noop() {
            return Ok(MoveOutcome::unchanged(state));
        }

        match intent.kind {
            MoveKind::Column => {
                let command =
                    MoveColumn::new(intent.dragged_item_id.clone(), intent.destination_index);
                self.move_column(state, &command)
            }
            MoveKind::Card => {
                let command = MoveCard::new(
                    intent.dragged_item_id.clone(),
                    intent.source_container_id.clone(),
                    intent.destination_container_id.clone(),
                    intent.destination_index,
                );
                self.move_card(state, &command)
            }
        }
    }

    /// Apply a column reorder
    pub fn move_column(&self, state: &BoardState, command: &MoveColumn) -> Result<MoveOutcome> {
        let moved_id = state
            .find_column_by_drag_id(&command.column)
            .map(|column| column.id);
        let next = command.apply(state)?;
        if next == *state {
            return Ok(MoveOutcome::unchanged(state));
        }

        let mut changes = Vec::new();
        if let Some(moved) = moved_id.and_then(|id| next.find_column(id)) {
            changes.push(SyncRequest::for_column(moved));
        }
        if self.policy == PersistPolicy::AllChanged {
            changes.extend(shifted_columns(state, &next, &changes));
        }

        Ok(MoveOutcome {
            state: next,
            changes,
            noop: false,
        })
    }

    /// Apply a card move, within a column or across columns
    pub fn move_card(&self, state: &BoardState, command: &MoveCard) -> Result<MoveOutcome> {
        // Resolved in the source column, the same way the command does
        let moved_id = state
            .find_column_by_drag_id(&command.from_column)
            .and_then(|column| column.find_card_by_drag_id(&command.card))
            .map(|card| card.id);
        let next = command.apply(state)?;
        if next == *state {
            return Ok(MoveOutcome::unchanged(state));
        }

        let mut changes = Vec::new();
        if let Some(moved) = moved_id.and_then(|id| next.find_card(id)) {
            changes.push(SyncRequest::for_card(moved));
        }
        if self.policy == PersistPolicy::AllChanged {
            changes.extend(shifted_cards(state, &next, &changes));
        }

        Ok(MoveOutcome {
            state: next,
            changes,
            noop: false,
        })
    }
}

/// Columns whose position differs between `before` and `after`, minus any
/// already in `reported`.
fn shifted_columns(
    before: &BoardState,
    after: &BoardState,
    reported: &[SyncRequest],
) -> Vec<SyncRequest> {
    let old: HashMap<ColumnId, usize> = before.columns.iter().map(|c| (c.id, c.position)).collect();

    after
        .columns
        .iter()
        .filter(|c| old.get(&c.id) != Some(&c.position))
        .map(SyncRequest::for_column)
        .filter(|request| !reported.contains(request))
        .collect()
}

/// Cards whose position or column differs between `before` and `after`,
/// minus any already in `reported`.
fn shifted_cards(
    before: &BoardState,
    after: &BoardState,
    reported: &[SyncRequest],
) -> Vec<SyncRequest> {
    let old: HashMap<CardId, (ColumnId, usize)> = before
        .cards()
        .map(|c| (c.id, (c.column_id, c.position)))
        .collect();

    after
        .cards()
        .filter(|c| old.get(&c.id) != Some(&(c.column_id, c.position)))
        .map(SyncRequest::for_card)
        .filter(|request| !reported.contains(request))
        .collect()
}
