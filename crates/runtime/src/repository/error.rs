//! Error types raised by collaborator implementations.

use thiserror::Error;

/// Errors surfaced by repositories and other external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("cannot take {requested} of {key:?}: only {available} held")]
    InsufficientQuantity {
        key: String,
        available: u32,
        requested: u32,
    },

    #[error("collaborator rejected the request: {0}")]
    Rejected(String),
}

impl RepositoryError {
    /// Whether the same call may succeed when retried later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
