//! Error types for the board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Column not found (by stable id or drag id)
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Card not found (by stable id or drag id)
    #[error("card not found: {id}")]
    CardNotFound { id: String },

    /// Label not found
    #[error("label not found: {id}")]
    LabelNotFound { id: String },

    /// Comment not found
    #[error("comment not found: {id}")]
    CommentNotFound { id: String },

    /// Duplicate ID
    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Ordering invariant does not hold
    #[error("invariant violated: {message}")]
    InvariantViolation { message: String },
}

impl BoardError {
    /// Create a column-not-found error
    pub fn column_not_found(id: impl ToString) -> Self {
        Self::ColumnNotFound { id: id.to_string() }
    }

    /// Create a card-not-found error
    pub fn card_not_found(id: impl ToString) -> Self {
        Self::CardNotFound { id: id.to_string() }
    }

    /// Create a label-not-found error
    pub fn label_not_found(id: impl ToString) -> Self {
        Self::LabelNotFound { id: id.to_string() }
    }

    /// Create a comment-not-found error
    pub fn comment_not_found(id: impl ToString) -> Self {
        Self::CommentNotFound { id: id.to_string() }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl ToString) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Check if this is a "referenced entity is missing" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound { .. }
                | Self::CardNotFound { .. }
                | Self::LabelNotFound { .. }
                | Self::CommentNotFound { .. }
        )
    }
}

/// Errors raised by a [`crate::sync::SyncAdapter`]
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote store rejected or failed the update
    #[error("remote update failed for {op}: {message}")]
    Remote { op: String, message: String },

    /// IO error (outbox file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Create a remote failure
    pub fn remote(op: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            op: op.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading [`crate::BoardConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("config file not found: {path}")]
    MissingFile { path: PathBuf },

    /// A source could not be parsed or extracted
    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::card_not_found("abc123");
        assert_eq!(err.to_string(), "card not found: abc123");
    }

    #[test]
    fn test_is_not_found() {
        assert!(BoardError::column_not_found(4).is_not_found());
        assert!(BoardError::comment_not_found(4).is_not_found());
        assert!(!BoardError::invariant("gap").is_not_found());
        assert!(!BoardError::duplicate_id("card", 1).is_not_found());
    }

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::remote("update column", "503");
        assert!(err.to_string().contains("update column"));
        assert!(err.to_string().contains("503"));
    }
}
