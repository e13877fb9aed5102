//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from repositories, reward rules, and configuration so
//! request handlers can tell a benign race from a hard failure.
use std::fmt;

use encounter_core::{
    ConfigError, EncounterId, EngineError, ErrorSeverity, RewardBundle, RewardError, UserId,
};
use serde::Serialize;
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, ResolutionError>;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("{reason}")]
    Validation { reason: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("{0} is already resolved")]
    AlreadyResolved(EncounterId),

    #[error("not enough {item}: need {required}, have {available}")]
    InsufficientConsumables {
        item: String,
        required: u32,
        available: u32,
    },

    /// Lost a race for the last claimable monster; the debit was refunded.
    #[error("capture unavailable, try again: {reason}")]
    CaptureUnavailable { reason: String },

    #[error(transparent)]
    Persistence(#[from] RepositoryError),

    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("coordinator requires a {0} to be configured before building")]
    MissingCollaborator(&'static str),

    /// State was committed but a follow-up step failed; see [`PartialFailure`].
    #[error("{encounter} partially resolved: {failure}")]
    PartialFailure {
        encounter: EncounterId,
        failure: PartialFailure,
        #[source]
        source: RepositoryError,
    },
}

/// What was left behind when a resolution step failed after its commit point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialFailure {
    /// The battle is resolved; these rewards still need delivering.
    UndeliveredRewards { rewards: RewardBundle },

    /// The group claim stands without a creature. Consumables were refunded.
    OrphanedCapture {
        group_index: usize,
        requester: UserId,
    },
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeliveredRewards { rewards } => write!(
                f,
                "reward delivery failed ({} coins, {} items undelivered)",
                rewards.coins,
                rewards.items.len()
            ),
            Self::OrphanedCapture {
                group_index,
                requester,
            } => write!(
                f,
                "capture by {requester} recorded on group {group_index} but creature creation failed"
            ),
        }
    }
}

impl ResolutionError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(what: impl ToString) -> Self {
        Self::NotFound {
            what: what.to_string(),
        }
    }

    pub(crate) fn unavailable(reason: impl ToString) -> Self {
        Self::CaptureUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Whether the failure left state needing manual repair.
    pub fn is_partial_failure(&self) -> bool {
        matches!(self, Self::PartialFailure { .. })
    }

    /// Whether resubmitting the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::CaptureUnavailable { .. } => true,
            Self::Persistence(err) => err.is_transient(),
            _ => false,
        }
    }
}

impl EngineError for ResolutionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. }
            | Self::NotFound { .. }
            | Self::AlreadyResolved(_)
            | Self::InsufficientConsumables { .. } => ErrorSeverity::Validation,
            Self::CaptureUnavailable { .. } => ErrorSeverity::Recoverable,
            Self::Persistence(err) if err.is_transient() => ErrorSeverity::Recoverable,
            Self::Persistence(_) | Self::PartialFailure { .. } => ErrorSeverity::Internal,
            Self::Reward(err) => err.severity(),
            Self::Config(err) => err.severity(),
            Self::MissingCollaborator(_) => ErrorSeverity::Fatal,
        }
    }
}
