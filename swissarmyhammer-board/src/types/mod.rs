//! Core types for the board engine

mod board;
mod card;
mod ids;

// Re-export all types
pub use board::{Board, Column, Label};
pub use card::{Card, CardPatch, Comment};
pub use ids::{BoardId, CardId, ColumnId, CommentId, DragId, LabelId, MemberId};
