//! Open-card tracking.
//!
//! A move produces a new state with new copies of every card, so the open
//! card is remembered by stable id and re-resolved after each mutation.

use crate::state::BoardState;
use crate::types::{Card, CardId};
use tracing::debug;

/// Resolve `selected` against `state`.
///
/// Returns the card's current copy, or `None` when nothing is selected or the
/// card no longer exists.
pub fn reconcile(state: &BoardState, selected: Option<CardId>) -> Option<Card> {
    let id = selected?;
    state.find_card(id).cloned()
}

/// What a reconcile did to the open card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing was open
    Unchanged,
    /// The open card still exists; its copy was refreshed
    Refreshed(Card),
    /// The open card is gone; the detail view should close
    Closed(CardId),
}

/// The currently open card, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    card: Option<Card>,
}

impl Selection {
    /// Nothing open
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a card by id. Returns false (and leaves the selection closed)
    /// when the id does not resolve.
    pub fn open(&mut self, state: &BoardState, id: CardId) -> bool {
        self.card = reconcile(state, Some(id));
        self.card.is_some()
    }

    /// Close the open card
    pub fn close(&mut self) {
        self.card = None;
    }

    /// Id of the open card
    pub fn id(&self) -> Option<CardId> {
        self.card.as_ref().map(|c| c.id)
    }

    /// Current copy of the open card
    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    /// Re-resolve the open card against a new state
    pub fn reconcile(&mut self, state: &BoardState) -> SelectionChange {
        let Some(id) = self.id() else {
            return SelectionChange::Unchanged;
        };

        match reconcile(state, Some(id)) {
            Some(card) => {
                self.card = Some(card.clone());
                SelectionChange::Refreshed(card)
            }
            None => {
                debug!(card_id = %id, "open card no longer exists, closing");
                self.card = None;
                SelectionChange::Closed(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, BoardId, CardPatch, Column, ColumnId};

    fn state() -> BoardState {
        BoardState::new(Board::new(1, "Test")).with_columns([Column::new(
            1,
            "A",
            BoardId(1),
        )
        .with_cards([Card::new(5, "five", ColumnId(1)), Card::new(6, "six", ColumnId(1))])])
    }

    #[test]
    fn test_reconcile_unset() {
        assert!(reconcile(&state(), None).is_none());
    }

    #[test]
    fn test_reconcile_found_returns_current_copy() {
        let mut state = state();
        state
            .update_card(CardId(5), &CardPatch::title("renamed"))
            .unwrap();
        let card = reconcile(&state, Some(CardId(5))).unwrap();
        assert_eq!(card.title, "renamed");
    }

    #[test]
    fn test_reconcile_missing() {
        let mut state = state();
        state.remove_card(CardId(5)).unwrap();
        assert!(reconcile(&state, Some(CardId(5))).is_none());
    }

    #[test]
    fn test_selection_refreshes_then_closes() {
        let mut state = state();
        let mut selection = Selection::new();
        assert!(selection.open(&state, CardId(6)));

        state.remove_card(CardId(5)).unwrap();
        match selection.reconcile(&state) {
            SelectionChange::Refreshed(card) => assert_eq!(card.position, 0),
            other => panic!("expected refresh, got {:?}", other),
        }

        state.remove_card(CardId(6)).unwrap();
        assert_eq!(selection.reconcile(&state), SelectionChange::Closed(CardId(6)));
        assert!(selection.card().is_none());
        assert_eq!(selection.reconcile(&state), SelectionChange::Unchanged);
    }

    #[test]
    fn test_open_unknown_card() {
        let mut selection = Selection::new();
        assert!(!selection.open(&state(), CardId(42)));
        assert!(selection.id().is_none());
    }
}
