//! Identifier newtypes.
//!
//! Entity ids are server-assigned integers and never change for the lifetime
//! of an entity. Drag ids are transient strings used only by the drag surface
//! to name draggables and droppables.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw numeric value
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Stable identifier of a board
    BoardId
);
define_id!(
    /// Stable identifier of a column
    ColumnId
);
define_id!(
    /// Stable identifier of a card
    CardId
);
define_id!(
    /// Stable identifier of a label
    LabelId
);
define_id!(
    /// Stable identifier of a comment
    CommentId
);
define_id!(
    /// Identifier of a board member (card creator, comment author)
    MemberId
);

/// Transient identifier used for drag tracking.
///
/// Never persisted as a reference: moves name their containers and the
/// dragged item by drag id, and the engine resolves them to entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DragId(String);

impl DragId {
    /// Generate a fresh random drag id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DragId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DragId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DragId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for DragId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
