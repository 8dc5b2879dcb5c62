//! Board-level types: Board, Column, Label

use super::card::Card;
use super::ids::{BoardId, ColumnId, DragId, LabelId, MemberId};
use crate::ordered::Positioned;
use serde::{Deserialize, Serialize};

/// The board itself - just metadata.
/// Columns and labels live on [`crate::BoardState`] next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Member who created the board
    pub creator: MemberId,
}

impl Board {
    /// Create a new board with the given id and name
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
            creator: MemberId::default(),
        }
    }

    /// Set the background image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the creator
    pub fn with_creator(mut self, creator: MemberId) -> Self {
        self.creator = creator;
        self
    }
}

/// A column defines a workflow stage and owns its cards in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    /// Transient id used by the drag surface, also the droppable id for cards
    pub drag_id: DragId,
    pub name: String,
    pub position: usize,
    pub board_id: BoardId,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    /// Create an empty column with a fresh drag id
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, board_id: BoardId) -> Self {
        Self {
            id: id.into(),
            drag_id: DragId::new(),
            name: name.into(),
            position: 0,
            board_id,
            cards: Vec::new(),
        }
    }

    /// Set the drag id
    pub fn with_drag_id(mut self, drag_id: impl Into<DragId>) -> Self {
        self.drag_id = drag_id.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Place cards into this column in the given order.
    ///
    /// Each card's owning-column id and position are rewritten to match.
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        let id = self.id;
        self.cards = cards
            .into_iter()
            .enumerate()
            .map(|(position, mut card)| {
                card.column_id = id;
                card.position = position;
                card
            })
            .collect();
        self
    }

    /// Find a card by its stable id
    pub fn find_card(&self, id: super::CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Find a card by its drag id
    pub fn find_card_by_drag_id(&self, drag_id: &DragId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.drag_id == drag_id)
    }
}

impl Positioned for Column {
    type Id = ColumnId;

    fn key(&self) -> ColumnId {
        self.id
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// A label categorizes cards.
///
/// Color defaults to a deterministic auto-color based on the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub text: String,
    /// 6-character hex color code without #
    pub color: String,
    pub board_id: BoardId,
}

impl Label {
    /// Create a new label with an auto-color based on its text
    pub fn new(id: impl Into<LabelId>, text: impl Into<String>, board_id: BoardId) -> Self {
        let text = text.into();
        let color = crate::auto_color::auto_color(&text).to_string();
        Self {
            id: id.into(),
            text,
            color,
            board_id,
        }
    }

    /// Create a new label with an explicit color.
    ///
    /// A leading `#` is accepted and stripped.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.color = color.trim_start_matches('#').to_string();
        self
    }
}
