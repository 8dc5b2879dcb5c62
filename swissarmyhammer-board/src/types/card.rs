//! Card types: Card, Comment, CardPatch

use super::ids::{CardId, ColumnId, CommentId, DragId, LabelId, MemberId};
use crate::ordered::Positioned;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Transient id used by the drag surface
    pub drag_id: DragId,
    pub title: String,
    /// Rich-text body
    #[serde(default)]
    pub text_description: String,
    /// Owning column, resolved by lookup
    pub column_id: ColumnId,
    pub position: usize,
    #[serde(default)]
    pub labels: BTreeSet<LabelId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub creator: MemberId,
}

impl Card {
    /// Create a card with a fresh drag id. Position is assigned when the
    /// card is placed into a column.
    pub fn new(id: impl Into<CardId>, title: impl Into<String>, column_id: ColumnId) -> Self {
        Self {
            id: id.into(),
            drag_id: DragId::new(),
            title: title.into(),
            text_description: String::new(),
            column_id,
            position: 0,
            labels: BTreeSet::new(),
            comments: Vec::new(),
            creator: MemberId::default(),
        }
    }

    /// Set the drag id
    pub fn with_drag_id(mut self, drag_id: impl Into<DragId>) -> Self {
        self.drag_id = drag_id.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.text_description = text.into();
        self
    }

    /// Set the position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Set the labels
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelId>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Set the creator
    pub fn with_creator(mut self, creator: MemberId) -> Self {
        self.creator = creator;
        self
    }

    /// True if the card carries any of the given labels
    pub fn has_any_label(&self, labels: &[LabelId]) -> bool {
        labels.iter().any(|label| self.labels.contains(label))
    }

    /// Case-insensitive title containment
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Apply a field patch. Order fields are not part of a patch.
    pub fn apply_patch(&mut self, patch: &CardPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(text) = &patch.text_description {
            self.text_description = text.clone();
        }
    }

    /// Find a comment by ID
    pub fn find_comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Find a comment by ID (mutable)
    pub fn find_comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }
}

impl Positioned for Card {
    type Id = CardId;

    fn key(&self) -> CardId {
        self.id
    }

    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

/// Field edits merged in from outside the move engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_description: Option<String>,
}

impl CardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            text_description: None,
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.text_description = Some(text.into());
        self
    }
}

/// A comment on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub member_id: MemberId,
    pub card_id: CardId,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a comment stamped with the current time
    pub fn new(
        id: impl Into<CommentId>,
        card_id: CardId,
        member_id: MemberId,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            member_id,
            card_id,
            created_at: Utc::now(),
        }
    }
}
