//! Board state errors.

use std::fmt;

/// Which kind of entity an id referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Page,
    Filter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Page => f.write_str("page"),
            EntityKind::Filter => f.write_str("filter"),
        }
    }
}

/// Errors from board and filter mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The id does not name a live page or filter
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// A page with this id is already on the board
    #[error("page {0} already exists")]
    DuplicateId(String),
}

impl BoardError {
    pub fn page_not_found(id: impl fmt::Display) -> Self {
        BoardError::NotFound {
            kind: EntityKind::Page,
            id: id.to_string(),
        }
    }

    pub fn filter_not_found(id: impl fmt::Display) -> Self {
        BoardError::NotFound {
            kind: EntityKind::Filter,
            id: id.to_string(),
        }
    }
}
