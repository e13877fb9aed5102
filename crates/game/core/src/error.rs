//! Common error infrastructure for encounter-core.
//!
//! Domain-specific errors (e.g. [`RewardError`](crate::reward::RewardError),
//! [`GroupError`](crate::encounter::GroupError)) live next to the rules that
//! raise them. This module provides the severity classification shared by all
//! of them so callers in the runtime can decide how to surface a failure.

use thiserror::Error;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: benign contention; the same request may succeed on retry
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: misconfiguration; nothing can succeed until it is fixed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with the same request.
    ///
    /// Examples: group depleted by a concurrent capture, version conflict
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: wrong encounter kind, insufficient consumables
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: capture record pointing at a missing group
    Internal,

    /// Fatal error - configuration is unusable.
    ///
    /// Examples: empty item catalog, outcome table with no weight
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or misconfiguration.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all encounter-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;
}

/// Rejections raised by [`EncounterConfig::validate`](crate::config::EncounterConfig::validate).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{table} weight table has no positive weight")]
    EmptyWeightTable { table: &'static str },

    #[error("battle outcome {0} is listed more than once")]
    DuplicateOutcome(crate::outcome::BattleOutcome),

    #[error("default battle outcome {0} has no profile")]
    MissingOutcomeProfile(crate::outcome::BattleOutcome),

    #[error("capture device {name:?} has base rate {rate} outside [0.5, 1.0]")]
    DeviceRateOutOfRange { name: String, rate: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("no capture device has the guaranteed base rate {rate}")]
    MissingGuaranteedDevice { rate: f64 },
}

impl EngineError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}
