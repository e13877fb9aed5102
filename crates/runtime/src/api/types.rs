//! Requests accepted and results returned by the Resolution Coordinator.

use encounter_core::{
    BattleOutcome, CaptureChance, EncounterId, RewardBundle, TargetDescriptor, UserId,
};
use serde::{Deserialize, Serialize};

use crate::repository::{CreatedCreature, Trainer};

/// A capture attempt as issued by a chat command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub encounter: EncounterId,
    pub requester: UserId,
    /// Name of the requester's trainer that receives the creature.
    pub trainer_name: String,
    /// Free-form capture device name, e.g. `"ultraball"`.
    pub device: String,
    /// Items spent alongside the device. Only the configured boost item
    /// raises the chance, but every listed item is debited.
    #[serde(default)]
    pub boosts: Vec<String>,
    /// 1-based index into the requester's target list. Out-of-range values
    /// are clamped.
    #[serde(default = "first_target")]
    pub target_index: usize,
    #[serde(default)]
    pub mid_battle: bool,
}

fn first_target() -> usize {
    1
}

impl CaptureRequest {
    pub fn new(
        encounter: EncounterId,
        requester: impl Into<UserId>,
        trainer_name: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            encounter,
            requester: requester.into(),
            trainer_name: trainer_name.into(),
            device: device.into(),
            boosts: Vec::new(),
            target_index: first_target(),
            mid_battle: false,
        }
    }

    pub fn boost(mut self, item: impl Into<String>) -> Self {
        self.boosts.push(item.into());
        self
    }

    pub fn boosts(mut self, item: &str, count: u32) -> Self {
        self.boosts
            .extend(std::iter::repeat_n(item.to_string(), count as usize));
        self
    }

    pub fn target(mut self, index: usize) -> Self {
        self.target_index = index;
        self
    }

    pub fn mid_battle(mut self, mid_battle: bool) -> Self {
        self.mid_battle = mid_battle;
        self
    }
}

/// Result of a successful [`resolve_battle`](crate::ResolutionCoordinator::resolve_battle).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattleResolution {
    pub encounter: EncounterId,
    pub outcome: BattleOutcome,
    pub rewards: RewardBundle,
    pub resolved_by: UserId,
    pub recipients: Vec<UserId>,
}

/// Consumables spent on one attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpentConsumables {
    /// Canonical device name as debited from the ball pouch.
    pub device: String,
    /// Item name to quantity, in request order.
    pub items: Vec<(String, u32)>,
    /// How many of `items` counted as boosts.
    pub boost_count: u32,
}

/// Everything an attempt decided, whatever the roll.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaptureReport {
    pub encounter: EncounterId,
    pub trainer: Trainer,
    pub target: TargetDescriptor,
    pub spent: SpentConsumables,
    pub chance: CaptureChance,
    /// `chance.probability` as a rounded whole percent.
    pub chance_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CaptureOutcome {
    Captured {
        report: CaptureReport,
        creature: CreatedCreature,
    },
    Escaped {
        report: CaptureReport,
    },
    /// The requester has no claimable target; nothing was debited.
    NothingToCapture,
}

impl CaptureOutcome {
    pub fn report(&self) -> Option<&CaptureReport> {
        match self {
            Self::Captured { report, .. } | Self::Escaped { report } => Some(report),
            Self::NothingToCapture => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured { .. })
    }
}
