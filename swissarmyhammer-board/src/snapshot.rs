//! Board-fetch wire format and hydration.
//!
//! The remote store answers a board fetch with
//! `{ kanban: {...}, columns: [{ ..., items: [...] }] }`. Field names follow
//! the server's conventions (`idKanban`, `label__id`, `idMember_id`), which is
//! why the renames below look the way they do. Unknown fields are ignored.

use crate::error::{BoardError, Result};
use crate::ordered;
use crate::state::BoardState;
use crate::types::{
    Board, BoardId, Card, CardId, Column, ColumnId, Comment, CommentId, DragId, Label, LabelId,
    MemberId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Top-level board-fetch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardResponse {
    pub kanban: KanbanResponse,
    #[serde(default)]
    pub columns: Vec<ColumnResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanResponse {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
    #[serde(default)]
    pub id_member_creator: u64,
    #[serde(default)]
    pub labels: Vec<LabelResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResponse {
    pub id: u64,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnResponse {
    pub id: u64,
    pub uuid: String,
    pub name: String,
    pub id_kanban: u64,
    pub position: usize,
    #[serde(default)]
    pub items: Vec<CardResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: u64,
    pub uuid: String,
    pub title: String,
    pub position: usize,
    #[serde(default)]
    pub text_description: String,
    #[serde(default)]
    pub creator: u64,
    #[serde(default)]
    pub labels: Vec<CardLabelResponse>,
    #[serde(default)]
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLabelResponse {
    #[serde(rename = "label__id")]
    pub id: u64,
    #[serde(rename = "label__text", default)]
    pub text: String,
    #[serde(rename = "label__color", default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: u64,
    pub text: String,
    #[serde(rename = "idMember_id")]
    pub member_id: u64,
    #[serde(rename = "idCard_id")]
    pub card_id: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl BoardResponse {
    /// Parse a response body
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize back to a response body
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build a [`BoardState`] from a fetch response.
///
/// Columns and cards are ordered by the server's positions and then
/// renumbered, so a server ordering with gaps still hydrates into a state
/// whose positions are contiguous. A response that repeats a card id, column
/// id or drag id is refused with [`BoardError::InvariantViolation`].
pub fn hydrate(response: BoardResponse) -> Result<BoardState> {
    let board_id = BoardId(response.kanban.id);
    let board = Board {
        id: board_id,
        name: response.kanban.name,
        image: response.kanban.imagem,
        creator: MemberId(response.kanban.id_member_creator),
    };

    let labels = response
        .kanban
        .labels
        .into_iter()
        .map(|l| Label {
            id: LabelId(l.id),
            text: l.text,
            color: l.color,
            board_id,
        })
        .collect::<Vec<_>>();

    let columns: Vec<Column> = response
        .columns
        .into_iter()
        .map(|c| hydrate_column(c, board_id))
        .collect();
    let columns = ordered::sort_by_position(columns);
    if !ordered::is_contiguous(&columns) {
        debug!(board_id = %board_id, "server column positions had gaps, renumbering");
    }

    let state = BoardState {
        board,
        columns: ordered::normalize(columns),
        labels,
    };
    if let Err(error) = state.check_invariants() {
        warn!(board_id = %board_id, error = %error, "refusing malformed board response");
        return Err(error);
    }
    info!(
        board_id = %board_id,
        columns = state.columns.len(),
        cards = state.card_count(),
        labels = state.labels.len(),
        "hydrated board"
    );
    Ok(state)
}

fn hydrate_column(column: ColumnResponse, board_id: BoardId) -> Column {
    let id = ColumnId(column.id);
    let cards: Vec<Card> = column
        .items
        .into_iter()
        .map(|card| hydrate_card(card, id))
        .collect();
    let cards = ordered::sort_by_position(cards);
    if !ordered::is_contiguous(&cards) {
        debug!(column_id = %id, "server card positions had gaps, renumbering");
    }

    Column {
        id,
        drag_id: DragId::from(column.uuid),
        name: column.name,
        position: column.position,
        board_id,
        cards: ordered::normalize(cards),
    }
}

fn hydrate_card(card: CardResponse, column_id: ColumnId) -> Card {
    let id = CardId(card.id);
    Card {
        id,
        drag_id: DragId::from(card.uuid),
        title: card.title,
        text_description: card.text_description,
        column_id,
        position: card.position,
        labels: card.labels.into_iter().map(|l| LabelId(l.id)).collect(),
        comments: card
            .comments
            .into_iter()
            .map(|c| Comment {
                id: CommentId(c.id),
                text: c.text,
                member_id: MemberId(c.member_id),
                card_id: id,
                created_at: c.created_at,
            })
            .collect(),
        creator: MemberId(card.creator),
    }
}

impl TryFrom<BoardResponse> for BoardState {
    type Error = BoardError;

    fn try_from(response: BoardResponse) -> Result<Self> {
        hydrate(response)
    }
}

impl From<&BoardState> for BoardResponse {
    fn from(state: &BoardState) -> Self {
        let card_label = |id: &LabelId| match state.find_label(*id) {
            Some(label) => CardLabelResponse {
                id: id.get(),
                text: label.text.clone(),
                color: label.color.clone(),
            },
            None => CardLabelResponse {
                id: id.get(),
                text: String::new(),
                color: String::new(),
            },
        };

        Self {
            kanban: KanbanResponse {
                id: state.board.id.get(),
                name: state.board.name.clone(),
                imagem: state.board.image.clone(),
                id_member_creator: state.board.creator.get(),
                labels: state
                    .labels
                    .iter()
                    .map(|l| LabelResponse {
                        id: l.id.get(),
                        text: l.text.clone(),
                        color: l.color.clone(),
                    })
                    .collect(),
            },
            columns: state
                .columns
                .iter()
                .map(|column| ColumnResponse {
                    id: column.id.get(),
                    uuid: column.drag_id.to_string(),
                    name: column.name.clone(),
                    id_kanban: column.board_id.get(),
                    position: column.position,
                    items: column
                        .cards
                        .iter()
                        .map(|card| CardResponse {
                            id: card.id.get(),
                            uuid: card.drag_id.to_string(),
                            title: card.title.clone(),
                            position: card.position,
                            text_description: card.text_description.clone(),
                            creator: card.creator.get(),
                            labels: card.labels.iter().map(&card_label).collect(),
                            comments: card
                                .comments
                                .iter()
                                .map(|c| CommentResponse {
                                    id: c.id.get(),
                                    text: c.text.clone(),
                                    member_id: c.member_id.get(),
                                    card_id: c.card_id.get(),
                                    created_at: c.created_at,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
