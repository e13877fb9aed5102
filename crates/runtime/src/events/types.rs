//! Event types for different topics.

use encounter_core::{BattleOutcome, EncounterId, UserId};
use serde::{Deserialize, Serialize};

/// Events related to battle resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The battle was claimed and resolved exactly once
    BattleResolved {
        encounter: EncounterId,
        outcome: BattleOutcome,
        coins: u64,
        items: usize,
        resolved_by: UserId,
    },
}

/// Events related to capture attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureEvent {
    /// Consumables were spent and the success roll was made
    CaptureAttempted {
        encounter: EncounterId,
        requester: UserId,
        group_index: usize,
        chance_percent: u32,
        success: bool,
    },

    /// The group claim was written and the creature created
    CaptureCommitted {
        encounter: EncounterId,
        requester: UserId,
        group_index: usize,
        creature_id: u64,
    },
}
