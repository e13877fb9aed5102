use super::{MonsterGroup, SpeciesDescriptor};

/// Opposing trainer in a trainer battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTrainer {
    pub name: String,
    pub level: u32,
}

impl EnemyTrainer {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// One opposing monster.
///
/// `group_index` links the monster back to the wild group it came from when
/// the battle was escalated from an aggressive wild encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyMonster {
    pub species: SpeciesDescriptor,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_index: Option<usize>,
}

impl EnemyMonster {
    pub fn new(species: SpeciesDescriptor, level: u32) -> Self {
        Self {
            species,
            level,
            group_index: None,
        }
    }

    pub fn from_group(index: usize, group: &MonsterGroup, level: u32) -> Self {
        Self {
            species: group.species.clone(),
            level,
            group_index: Some(index),
        }
    }
}

/// Payload of a battle encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleEncounter {
    #[cfg_attr(feature = "serde", serde(default))]
    pub trainers: Vec<EnemyTrainer>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub monsters: Vec<EnemyMonster>,
    /// Wild groups this battle escalated from; mid-battle captures draw here.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wild_groups: Vec<MonsterGroup>,
}

impl BattleEncounter {
    /// Size of the opposing party used by the coin formula.
    ///
    /// Trainers and monsters both count.
    pub fn enemy_count(&self) -> u32 {
        u32::try_from(self.trainers.len() + self.monsters.len()).unwrap_or(u32::MAX)
    }

    pub fn is_trainer_battle(&self) -> bool {
        !self.trainers.is_empty()
    }
}
