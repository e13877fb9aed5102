//! Records exchanged with external collaborators.

use std::collections::BTreeMap;
use std::fmt;

use encounter_core::{
    AdventureId, BattleOutcome, EncounterId, SpeciesDescriptor, TargetDescriptor, UserId,
};
use serde::{Deserialize, Serialize};

/// Internal account linked to a chat-platform user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

/// Owned entity that holds inventory and creatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainerId(pub u64);

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trainer#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub user: UserId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: TrainerId,
    pub name: String,
    pub owner: AccountId,
}

impl Trainer {
    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InventoryCategory {
    Balls,
    Items,
    Berries,
}

/// Consumable holdings of one trainer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub balls: BTreeMap<String, u32>,
    pub items: BTreeMap<String, u32>,
    pub berries: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn category(&self, category: InventoryCategory) -> &BTreeMap<String, u32> {
        match category {
            InventoryCategory::Balls => &self.balls,
            InventoryCategory::Items => &self.items,
            InventoryCategory::Berries => &self.berries,
        }
    }

    pub fn category_mut(&mut self, category: InventoryCategory) -> &mut BTreeMap<String, u32> {
        match category {
            InventoryCategory::Balls => &mut self.balls,
            InventoryCategory::Items => &mut self.items,
            InventoryCategory::Berries => &mut self.berries,
        }
    }

    /// Quantity held under `key`; 0 when absent.
    pub fn quantity(&self, category: InventoryCategory, key: &str) -> u32 {
        self.category(category).get(key).copied().unwrap_or(0)
    }
}

/// Everything the creature factory needs to create a captured monster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub species: SpeciesDescriptor,
    pub level: u32,
    pub encounter: EncounterId,
    pub group_index: usize,
    /// Capture device the creature was caught with.
    pub device: String,
}

impl CreatureSpec {
    pub fn from_target(encounter: EncounterId, target: &TargetDescriptor, device: &str) -> Self {
        Self {
            species: target.species.clone(),
            level: target.level,
            encounter,
            group_index: target.group_index,
            device: device.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCreature {
    pub id: u64,
    pub owner: TrainerId,
    pub species: SpeciesDescriptor,
    pub level: u32,
}

/// Result of a version-guarded payload write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { version: u64 },
    /// The stored record moved on (or was resolved) since it was read.
    Conflict { current_version: u64 },
}

/// Where a reward bundle came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSource {
    pub encounter: EncounterId,
    pub adventure: AdventureId,
    pub outcome: BattleOutcome,
    pub resolved_by: UserId,
}
