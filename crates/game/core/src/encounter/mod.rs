//! Persisted encounter records.
//!
//! An [`Encounter`] is owned by an adventure and carries a kind-specific
//! payload. Two fields guard concurrent resolution:
//!
//! - `resolved` is monotonic (`false → true`); a resolved encounter is never
//!   mutated again by the resolution path
//! - `version` increments on every stored write so stores can apply
//!   compare-and-swap updates of the payload
mod battle;
mod group;
mod species;

use core::fmt;

pub use battle::{BattleEncounter, EnemyMonster, EnemyTrainer};
pub use group::{CaptureRecord, GroupError, MonsterGroup, WildEncounter, record_group_capture};
pub use species::SpeciesDescriptor;

use crate::env::CatalogItem;

/// Numeric identity of an encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EncounterId(pub u64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encounter#{}", self.0)
    }
}

/// Adventure an encounter belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AdventureId(pub u64);

impl fmt::Display for AdventureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adventure#{}", self.0)
    }
}

/// Chat-platform identity of a requester.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EncounterKind {
    Wild,
    Battle,
    Item,
}

/// An item lying on the trail; resolved outside this engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemEncounter {
    pub item: CatalogItem,
}

/// Kind-specific encounter data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EncounterPayload {
    Wild(WildEncounter),
    Battle(BattleEncounter),
    Item(ItemEncounter),
}

impl EncounterPayload {
    pub fn kind(&self) -> EncounterKind {
        match self {
            Self::Wild(_) => EncounterKind::Wild,
            Self::Battle(_) => EncounterKind::Battle,
            Self::Item(_) => EncounterKind::Item,
        }
    }

    /// Groups a capture may draw from.
    ///
    /// Wild encounters expose their groups; battles expose the wild groups
    /// they were escalated from (empty for trainer battles).
    pub fn capture_groups(&self) -> Option<&[MonsterGroup]> {
        match self {
            Self::Wild(wild) => Some(&wild.groups),
            Self::Battle(battle) => Some(&battle.wild_groups),
            Self::Item(_) => None,
        }
    }

    pub fn capture_groups_mut(&mut self) -> Option<&mut Vec<MonsterGroup>> {
        match self {
            Self::Wild(wild) => Some(&mut wild.groups),
            Self::Battle(battle) => Some(&mut battle.wild_groups),
            Self::Item(_) => None,
        }
    }
}

/// A generated in-game event tied to an adventure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub id: EncounterId,
    pub adventure: AdventureId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resolved: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_by: Option<UserId>,
    pub payload: EncounterPayload,
}

impl Encounter {
    pub fn new(id: EncounterId, adventure: AdventureId, payload: EncounterPayload) -> Self {
        Self {
            id,
            adventure,
            resolved: false,
            version: 0,
            created_by: None,
            payload,
        }
    }

    pub fn wild(id: u64, adventure: u64, groups: Vec<MonsterGroup>) -> Self {
        Self::new(
            EncounterId(id),
            AdventureId(adventure),
            EncounterPayload::Wild(WildEncounter { groups }),
        )
    }

    pub fn battle(id: u64, adventure: u64, battle: BattleEncounter) -> Self {
        Self::new(
            EncounterId(id),
            AdventureId(adventure),
            EncounterPayload::Battle(battle),
        )
    }

    pub fn created_by(mut self, user: UserId) -> Self {
        self.created_by = Some(user);
        self
    }

    pub fn kind(&self) -> EncounterKind {
        self.payload.kind()
    }

    /// Whether a capture request may target this encounter.
    ///
    /// Wild encounters always qualify; battles only when the request is
    /// explicitly a mid-battle capture.
    pub fn is_capture_eligible(&self, mid_battle: bool) -> bool {
        match self.kind() {
            EncounterKind::Wild => true,
            EncounterKind::Battle => mid_battle,
            EncounterKind::Item => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battles_need_the_mid_battle_flag() {
        let battle = Encounter::battle(1, 1, BattleEncounter::default());
        assert!(!battle.is_capture_eligible(false));
        assert!(battle.is_capture_eligible(true));

        let wild = Encounter::wild(2, 1, Vec::new());
        assert!(wild.is_capture_eligible(false));
        assert!(wild.is_capture_eligible(true));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn payload_round_trips_through_json() {
        let encounter = Encounter::wild(
            9,
            3,
            vec![MonsterGroup::new(SpeciesDescriptor::new(["Eevee"], ["Normal"]), 2)],
        );
        let json = serde_json::to_string(&encounter).unwrap();
        assert!(json.contains("\"wild\":{\"groups\""));
        let back: Encounter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, encounter);
    }
}
