//! Random encounter generation for an adventure step.
//!
//! The kind is rolled through the Probability Roller, then a kind-specific
//! payload is built. Wild encounters whose groups are too aggressive
//! (`agro >= auto_battle_agro`) become battles against those groups; the
//! original groups stay attached so they can still be captured mid-battle.

use thiserror::Error;

use crate::config::{GenerationRules, Span};
use crate::encounter::{
    BattleEncounter, EncounterPayload, EnemyMonster, EnemyTrainer, ItemEncounter, MonsterGroup,
    SpeciesDescriptor, WildEncounter,
};
use crate::env::{CatalogItem, RandomSource};
use crate::error::{EngineError, ErrorSeverity};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GeneratedKind {
    Battle,
    Wild,
    Item,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("item catalog is empty; cannot generate an item encounter")]
    EmptyCatalog,
}

impl EngineError for GenerationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// Upper bounds on how many species and types a rolled monster may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeciesLimits {
    pub max_species: usize,
    pub max_types: usize,
}

impl SpeciesLimits {
    /// Limits used for wild groups.
    pub const WILD: Self = Self {
        max_species: SpeciesDescriptor::MAX_SPECIES,
        max_types: SpeciesDescriptor::MAX_TYPES,
    };

    /// Limits used for battle opponents.
    pub const ENEMY: Self = Self {
        max_species: 2,
        max_types: 3,
    };
}

/// Supplies monster species for generated encounters.
pub trait SpeciesSource: Send + Sync {
    /// Rolls one species descriptor, or `None` when nothing fits the limits.
    fn roll_species(&self, limits: SpeciesLimits, rng: &dyn RandomSource)
    -> Option<SpeciesDescriptor>;
}

/// Uniform pick from a fixed list of descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeciesPool {
    entries: Vec<SpeciesDescriptor>,
}

impl SpeciesPool {
    pub fn new(entries: Vec<SpeciesDescriptor>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpeciesSource for SpeciesPool {
    fn roll_species(
        &self,
        limits: SpeciesLimits,
        rng: &dyn RandomSource,
    ) -> Option<SpeciesDescriptor> {
        let fitting: Vec<&SpeciesDescriptor> = self
            .entries
            .iter()
            .filter(|d| d.species.len() <= limits.max_species && d.types.len() <= limits.max_types)
            .collect();
        if fitting.is_empty() {
            return None;
        }
        Some(fitting[rng.below(fitting.len() as u64) as usize].clone())
    }
}

/// Per-area overrides of the generation defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AreaParams {
    pub level_range: Option<Span>,
    pub agro_range: Option<Span>,
    /// Added to each rolled group size before clamping.
    pub group_size_modifier: i32,
}

/// A freshly generated encounter payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratedEncounter {
    Wild(WildEncounter),
    Battle(BattleEncounter),
    /// Wild encounter escalated by aggressive groups.
    AutoBattle(BattleEncounter),
    Item(ItemEncounter),
}

impl GeneratedEncounter {
    pub fn kind(&self) -> GeneratedKind {
        match self {
            Self::Wild(_) => GeneratedKind::Wild,
            Self::Battle(_) | Self::AutoBattle(_) => GeneratedKind::Battle,
            Self::Item(_) => GeneratedKind::Item,
        }
    }

    pub fn into_payload(self) -> EncounterPayload {
        match self {
            Self::Wild(wild) => EncounterPayload::Wild(wild),
            Self::Battle(battle) | Self::AutoBattle(battle) => EncounterPayload::Battle(battle),
            Self::Item(item) => EncounterPayload::Item(item),
        }
    }
}

pub struct EncounterGenerator<S> {
    rules: GenerationRules,
    species: S,
}

impl<S: SpeciesSource> EncounterGenerator<S> {
    pub fn new(rules: GenerationRules, species: S) -> Self {
        Self { rules, species }
    }

    pub fn roll_kind(&self, rng: &dyn RandomSource) -> GeneratedKind {
        self.rules.kind_weights.roll(rng)
    }

    /// Rolls a kind and builds the matching encounter.
    pub fn generate(
        &self,
        area: &AreaParams,
        catalog: &[CatalogItem],
        rng: &dyn RandomSource,
    ) -> Result<GeneratedEncounter, GenerationError> {
        match self.roll_kind(rng) {
            GeneratedKind::Battle => Ok(GeneratedEncounter::Battle(self.battle(area, rng))),
            GeneratedKind::Wild => Ok(self.wild(area, rng)),
            GeneratedKind::Item => self.item(catalog, rng).map(GeneratedEncounter::Item),
        }
    }

    /// Wild groups, escalated to an auto-battle when any group is aggressive.
    pub fn wild(&self, area: &AreaParams, rng: &dyn RandomSource) -> GeneratedEncounter {
        let group_count = self.rules.wild_groups.roll(rng);
        let mut groups: Vec<MonsterGroup> = (0..group_count)
            .filter_map(|_| self.wild_group(area, rng))
            .collect();
        if groups.is_empty() {
            groups.push(self.fallback_group());
        }

        let monsters: Vec<EnemyMonster> = groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.agro.unwrap_or(0) >= self.rules.auto_battle_agro)
            .map(|(index, g)| EnemyMonster::from_group(index, g, g.level.unwrap_or(self.rules.fallback_level)))
            .collect();

        if monsters.is_empty() {
            GeneratedEncounter::Wild(WildEncounter { groups })
        } else {
            GeneratedEncounter::AutoBattle(BattleEncounter {
                trainers: Vec::new(),
                monsters,
                wild_groups: groups,
            })
        }
    }

    pub fn battle(&self, area: &AreaParams, rng: &dyn RandomSource) -> BattleEncounter {
        let mut battle = BattleEncounter::default();
        if rng.chance(self.rules.trainer_battle_chance) {
            for _ in 0..self.rules.trainers.roll(rng) {
                battle.trainers.push(self.enemy_trainer(rng));
            }
        }

        let levels = area.level_range.unwrap_or(self.rules.default_level);
        for _ in 0..self.rules.battle_monsters.roll(rng) {
            let species = self
                .species
                .roll_species(SpeciesLimits::ENEMY, rng)
                .unwrap_or_else(|| self.rules.fallback_species.clone());
            battle.monsters.push(EnemyMonster::new(species, levels.roll(rng)));
        }
        battle
    }

    pub fn item(
        &self,
        catalog: &[CatalogItem],
        rng: &dyn RandomSource,
    ) -> Result<ItemEncounter, GenerationError> {
        if catalog.is_empty() {
            return Err(GenerationError::EmptyCatalog);
        }
        let item = catalog[rng.below(catalog.len() as u64) as usize].clone();
        Ok(ItemEncounter { item })
    }

    fn wild_group(&self, area: &AreaParams, rng: &dyn RandomSource) -> Option<MonsterGroup> {
        let species = self.species.roll_species(SpeciesLimits::WILD, rng)?;

        let mut size = self.rules.group_size.roll(rng);
        if area.group_size_modifier != 0 {
            let limit = self.rules.group_size_limit;
            let shifted = i64::from(size) + i64::from(area.group_size_modifier);
            size = shifted.clamp(i64::from(limit.min), i64::from(limit.max)) as u32;
        }

        let agro = area.agro_range.unwrap_or(self.rules.default_agro).roll(rng);
        let level = area.level_range.unwrap_or(self.rules.default_level).roll(rng);
        Some(MonsterGroup::new(species, size).with_agro(agro).with_level(level))
    }

    fn fallback_group(&self) -> MonsterGroup {
        MonsterGroup::new(self.rules.fallback_species.clone(), 1)
            .with_level(self.rules.fallback_level)
            .with_agro(self.rules.fallback_agro)
    }

    fn enemy_trainer(&self, rng: &dyn RandomSource) -> EnemyTrainer {
        let names = &self.rules.trainer_names;
        let name = if names.is_empty() {
            "Unknown Trainer".to_string()
        } else {
            names[rng.below(names.len() as u64) as usize].clone()
        };
        EnemyTrainer::new(name, self.rules.trainer_level.roll(rng))
    }
}
