//! BoardState - the in-memory aggregate of a board, its columns and cards.
//!
//! The state is a plain tree of owned sequences: the board owns columns, each
//! column owns its cards. Back-references (`card.column_id`,
//! `column.board_id`) are identifier fields resolved by lookup.
//!
//! The move engine never mutates a state in place; it takes one by reference
//! and returns a new one. Field edits made by other collaborators (dialogs,
//! label popovers, comment threads) are merged with the `&mut self` methods
//! below, none of which touch ordering except to append or to close a gap.

use crate::error::{BoardError, Result};
use crate::ordered::{self, Positioned};
use crate::types::{
    Board, Card, CardId, CardPatch, Column, ColumnId, Comment, CommentId, DragId, Label, LabelId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// A board with its columns and labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub board: Board,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl BoardState {
    /// Create an empty state for a board
    pub fn new(board: Board) -> Self {
        Self {
            board,
            columns: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Place columns on the board in the given order.
    ///
    /// Positions and board ids are rewritten to match.
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        let board_id = self.board.id;
        let columns = columns
            .into_iter()
            .map(|mut column| {
                column.board_id = board_id;
                column
            })
            .collect();
        self.columns = ordered::normalize(columns);
        self
    }

    /// Set the board's labels
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = Label>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    // =========================================================================
    // Structural queries
    // =========================================================================

    /// Find a column by its stable id
    pub fn find_column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Find a column by its drag id
    pub fn find_column_by_drag_id(&self, drag_id: &DragId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.drag_id == drag_id)
    }

    /// Find a card by stable id across all columns
    pub fn find_card(&self, id: CardId) -> Option<&Card> {
        self.cards().find(|c| c.id == id)
    }

    /// Find a card by drag id across all columns
    pub fn find_card_by_drag_id(&self, drag_id: &DragId) -> Option<&Card> {
        self.cards().find(|c| &c.drag_id == drag_id)
    }

    /// Find a label by id
    pub fn find_label(&self, id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Every card on the board, column by column, in display order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|column| column.cards.iter())
    }

    /// Total number of cards on the board
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Verify the ordering and parentage invariants
    pub fn check_invariants(&self) -> Result<()> {
        if !ordered::is_contiguous(&self.columns) {
            return Err(BoardError::invariant(format!(
                "column positions are not contiguous: {:?}",
                self.columns.iter().map(|c| c.position).collect::<Vec<_>>()
            )));
        }

        let mut columns_seen = HashSet::new();
        let mut drag_ids_seen = HashSet::new();
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !columns_seen.insert(column.id) {
                return Err(BoardError::invariant(format!(
                    "column {} appears more than once",
                    column.id
                )));
            }
            if !drag_ids_seen.insert(&column.drag_id) {
                return Err(BoardError::invariant(format!(
                    "drag id {} is used more than once",
                    column.drag_id
                )));
            }
            if !ordered::is_contiguous(&column.cards) {
                return Err(BoardError::invariant(format!(
                    "card positions in column {} are not contiguous: {:?}",
                    column.id,
                    column.cards.iter().map(|c| c.position).collect::<Vec<_>>()
                )));
            }
            for card in &column.cards {
                if card.column_id != column.id {
                    return Err(BoardError::invariant(format!(
                        "card {} claims column {} but sits in column {}",
                        card.id, card.column_id, column.id
                    )));
                }
                if !seen.insert(card.id) {
                    return Err(BoardError::invariant(format!(
                        "card {} appears more than once",
                        card.id
                    )));
                }
                if !drag_ids_seen.insert(&card.drag_id) {
                    return Err(BoardError::invariant(format!(
                        "drag id {} is used more than once",
                        card.drag_id
                    )));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Column edits
    // =========================================================================

    /// Append a column at the end of the board
    pub fn add_column(&mut self, mut column: Column) -> Result<()> {
        if self.find_column(column.id).is_some() {
            return Err(BoardError::duplicate_id("column", column.id));
        }
        column.board_id = self.board.id;
        column.position = self.columns.len();
        debug!(column_id = %column.id, position = column.position, "adding column");
        self.columns.push(column);
        Ok(())
    }

    /// Remove a column and close the gap it leaves
    pub fn remove_column(&mut self, id: ColumnId) -> Result<Column> {
        let (columns, removed) = ordered::take_by_id(std::mem::take(&mut self.columns), id);
        self.columns = columns;
        removed.ok_or_else(|| BoardError::column_not_found(id))
    }

    /// Rename a column
    pub fn rename_column(&mut self, id: ColumnId, name: impl Into<String>) -> Result<()> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| BoardError::column_not_found(id))?;
        column.name = name.into();
        Ok(())
    }

    // =========================================================================
    // Card edits
    // =========================================================================

    /// Append a card at the end of a column
    pub fn add_card(&mut self, column_id: ColumnId, card: Card) -> Result<()> {
        self.insert_card(column_id, card, usize::MAX)
    }

    /// Insert a card into a column at `index` (clamped to the column length)
    pub fn insert_card(&mut self, column_id: ColumnId, mut card: Card, index: usize) -> Result<()> {
        if self.find_card(card.id).is_some() {
            return Err(BoardError::duplicate_id("card", card.id));
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| BoardError::column_not_found(column_id))?;

        card.column_id = column_id;
        column.cards = ordered::insert_at(std::mem::take(&mut column.cards), card, index);
        Ok(())
    }

    /// Remove a card and close the gap in its column
    pub fn remove_card(&mut self, id: CardId) -> Result<Card> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.find_card(id).is_some())
            .ok_or_else(|| BoardError::card_not_found(id))?;

        let (cards, removed) = ordered::take_by_id(std::mem::take(&mut column.cards), id);
        column.cards = cards;
        removed.ok_or_else(|| BoardError::card_not_found(id))
    }

    /// Merge title/description edits into a card
    pub fn update_card(&mut self, id: CardId, patch: &CardPatch) -> Result<()> {
        self.card_mut(id)?.apply_patch(patch);
        Ok(())
    }

    /// Attach a board label to a card
    pub fn link_label(&mut self, card_id: CardId, label_id: LabelId) -> Result<()> {
        if self.find_label(label_id).is_none() {
            return Err(BoardError::label_not_found(label_id));
        }
        self.card_mut(card_id)?.labels.insert(label_id);
        Ok(())
    }

    /// Detach a label from a card. Detaching a label the card lacks is fine.
    pub fn unlink_label(&mut self, card_id: CardId, label_id: LabelId) -> Result<()> {
        self.card_mut(card_id)?.labels.remove(&label_id);
        Ok(())
    }

    // =========================================================================
    // Label edits
    // =========================================================================

    /// Create or replace a board label
    pub fn upsert_label(&mut self, mut label: Label) -> Result<()> {
        if !crate::auto_color::is_hex_color(&label.color) {
            return Err(BoardError::invalid_value(
                "color",
                format!("'{}' is not a 6-digit hex color", label.color),
            ));
        }
        label.color = label.color.trim_start_matches('#').to_string();
        label.board_id = self.board.id;

        match self.labels.iter_mut().find(|l| l.id == label.id) {
            Some(existing) => *existing = label,
            None => self.labels.push(label),
        }
        Ok(())
    }

    /// Delete a board label and unlink it from every card
    pub fn remove_label(&mut self, id: LabelId) -> Result<Label> {
        let index = self
            .labels
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| BoardError::label_not_found(id))?;
        let removed = self.labels.remove(index);

        for column in &mut self.columns {
            for card in &mut column.cards {
                card.labels.remove(&id);
            }
        }
        Ok(removed)
    }

    // =========================================================================
    // Comment edits
    // =========================================================================

    /// Append a comment to a card's thread
    pub fn add_comment(&mut self, card_id: CardId, mut comment: Comment) -> Result<()> {
        let card = self.card_mut(card_id)?;
        if card.find_comment(comment.id).is_some() {
            return Err(BoardError::duplicate_id("comment", comment.id));
        }
        comment.card_id = card_id;
        card.comments.push(comment);
        Ok(())
    }

    /// Replace the text of a comment
    pub fn update_comment(
        &mut self,
        card_id: CardId,
        comment_id: CommentId,
        text: impl Into<String>,
    ) -> Result<()> {
        let comment = self
            .card_mut(card_id)?
            .find_comment_mut(comment_id)
            .ok_or_else(|| BoardError::comment_not_found(comment_id))?;
        comment.text = text.into();
        Ok(())
    }

    /// Delete a comment from a card's thread
    pub fn remove_comment(&mut self, card_id: CardId, comment_id: CommentId) -> Result<Comment> {
        let card = self.card_mut(card_id)?;
        let index = card
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| BoardError::comment_not_found(comment_id))?;
        Ok(card.comments.remove(index))
    }

    fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.columns
            .iter_mut()
            .flat_map(|column| column.cards.iter_mut())
            .find(|card| card.key() == id)
            .ok_or_else(|| BoardError::card_not_found(id))
    }
}
