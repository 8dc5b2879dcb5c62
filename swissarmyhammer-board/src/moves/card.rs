//! MoveCard command

use crate::error::{BoardError, Result};
use crate::ordered::{self, Positioned};
use crate::state::BoardState;
use crate::types::{Card, DragId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Move a card within a column or to another column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCard {
    /// Drag id of the card being moved
    pub card: DragId,
    /// Drag id of the column the card is dragged out of
    pub from_column: DragId,
    /// Drag id of the column the card is dropped into
    pub to_column: DragId,
    /// Target index in the destination column
    pub to_index: usize,
}

impl MoveCard {
    /// Create a new MoveCard command
    pub fn new(
        card: impl Into<DragId>,
        from_column: impl Into<DragId>,
        to_column: impl Into<DragId>,
        to_index: usize,
    ) -> Self {
        Self {
            card: card.into(),
            from_column: from_column.into(),
            to_column: to_column.into(),
            to_index,
        }
    }

    /// Create a MoveCard command that stays in one column
    pub fn within(card: impl Into<DragId>, column: impl Into<DragId>, to_index: usize) -> Self {
        let column = column.into();
        Self::new(card, column.clone(), column, to_index)
    }

    /// Compute the new state. The input state is left untouched.
    pub fn apply(&self, state: &BoardState) -> Result<BoardState> {
        let source = state
            .columns
            .iter()
            .position(|c| c.drag_id == self.from_column)
            .ok_or_else(|| BoardError::column_not_found(&self.from_column))?;
        let destination = state
            .columns
            .iter()
            .position(|c| c.drag_id == self.to_column)
            .ok_or_else(|| BoardError::column_not_found(&self.to_column))?;
        let card = state.columns[source]
            .find_card_by_drag_id(&self.card)
            .ok_or_else(|| BoardError::card_not_found(&self.card))?;

        let mut next = state.clone();
        if source == destination {
            let cards = std::mem::take(&mut next.columns[source].cards);
            next.columns[source].cards = reorder_within(cards, card, self.to_index);
        } else {
            let source_cards = std::mem::take(&mut next.columns[source].cards);
            let (source_cards, taken) = ordered::take_by_id(source_cards, card.key());
            next.columns[source].cards = source_cards;

            let mut moved = taken.ok_or_else(|| BoardError::card_not_found(&self.card))?;
            moved.column_id = next.columns[destination].id;

            let destination_cards = std::mem::take(&mut next.columns[destination].cards);
            next.columns[destination].cards =
                insert_shifted(destination_cards, moved, self.to_index);
        }

        debug!(
            card_id = %card.id,
            from_column = %state.columns[source].id,
            to_column = %state.columns[destination].id,
            to_index = self.to_index,
            "moved card"
        );
        Ok(next)
    }
}

/// Same-column reorder: the dragged card takes the target slot and every card
/// between the two slots shifts one step toward the slot it vacated.
fn reorder_within(cards: Vec<Card>, dragged: &Card, to_index: usize) -> Vec<Card> {
    let from = dragged.position;
    let to = to_index.min(cards.len().saturating_sub(1));

    let shifted = cards
        .into_iter()
        .map(|mut card| {
            let position = card.position;
            card.position = if card.id == dragged.id {
                to
            } else if position >= to && position < from {
                position + 1
            } else if position <= to && position > from {
                position - 1
            } else {
                position
            };
            card
        })
        .collect();

    ordered::normalize(ordered::sort_by_position(shifted))
}

/// Cross-column drop: open a slot at `to_index` and place the card there.
fn insert_shifted(mut cards: Vec<Card>, mut card: Card, to_index: usize) -> Vec<Card> {
    let to = to_index.min(cards.len());
    for sibling in cards.iter_mut().filter(|c| c.position >= to) {
        sibling.position += 1;
    }
    card.position = to;
    cards.push(card);

    ordered::normalize(ordered::sort_by_position(cards))
}
