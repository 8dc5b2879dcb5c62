//! MoveColumn command

use crate::error::{BoardError, Result};
use crate::ordered::{self, Positioned};
use crate::state::BoardState;
use crate::types::{Column, DragId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reorder a column on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveColumn {
    /// Drag id of the column being moved
    pub column: DragId,
    /// Target index, clamped to the last slot
    pub to_index: usize,
}

impl MoveColumn {
    /// Create a new MoveColumn command
    pub fn new(column: impl Into<DragId>, to_index: usize) -> Self {
        Self {
            column: column.into(),
            to_index,
        }
    }

    /// Compute the reordered state. The input state is left untouched.
    pub fn apply(&self, state: &BoardState) -> Result<BoardState> {
        let target = state
            .find_column_by_drag_id(&self.column)
            .ok_or_else(|| BoardError::column_not_found(&self.column))?;
        let target_id = target.key();

        let rest: Vec<Column> = state
            .columns
            .iter()
            .filter(|c| c.id != target_id)
            .cloned()
            .collect();
        let mut rest = ordered::normalize(rest);

        let to_index = self.to_index.min(rest.len());
        for column in rest.iter_mut().filter(|c| c.position >= to_index) {
            column.position += 1;
        }

        let mut moved = target.clone();
        moved.position = to_index;
        rest.push(moved);

        let mut next = state.clone();
        next.columns = ordered::sort_by_position(rest);

        debug!(
            column_id = %target_id,
            from = target.position,
            to = to_index,
            "moved column"
        );
        Ok(next)
    }
}
