//! Tunable resolution parameters.
//!
//! [`EncounterConfig::default`] is the shipped balance; data files loaded by
//! `encounter-content` may override any section. Every table is validated by
//! [`EncounterConfig::validate`] before a coordinator accepts it.

use crate::encounter::SpeciesDescriptor;
use crate::env::RandomSource;
use crate::error::ConfigError;
use crate::generate::GeneratedKind;
use crate::outcome::{BattleOutcome, ItemRarity};
use crate::roll::WeightTable;

/// Complete set of encounter rules.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    pub battle: BattleRules,
    pub rewards: RewardRules,
    pub capture: CaptureRules,
    pub allocation: AllocationRules,
    pub adventure: AdventureRewardRates,
    pub generation: GenerationRules,
}

impl EncounterConfig {
    /// Rejects tables that would make a roll meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.battle.validate()?;
        self.rewards.validate()?;
        self.capture.validate()?;
        self.allocation.validate()?;
        self.adventure.validate()?;
        self.generation.validate()
    }
}

// ===== battle =====

/// Weight and effect metadata attached to one battle outcome.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeProfile {
    pub outcome: BattleOutcome,
    pub weight: u32,
    pub coin_multiplier: f64,
    pub item_chance: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleRules {
    /// Profiles in roll order.
    pub outcomes: Vec<OutcomeProfile>,
    /// Returned when the roll exhausts without a match.
    pub default_outcome: BattleOutcome,
}

impl BattleRules {
    pub fn outcome_table(&self) -> WeightTable<BattleOutcome> {
        WeightTable::new(
            self.outcomes.iter().map(|p| (p.outcome, p.weight)),
            self.default_outcome,
        )
    }

    pub fn profile(&self, outcome: BattleOutcome) -> Option<&OutcomeProfile> {
        self.outcomes.iter().find(|p| p.outcome == outcome)
    }

    /// Rolls a battle outcome.
    pub fn roll_outcome(&self, rng: &(impl RandomSource + ?Sized)) -> BattleOutcome {
        self.outcome_table().roll(rng)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.outcome_table().total_weight() == 0 {
            return Err(ConfigError::EmptyWeightTable { table: "battle outcome" });
        }
        for (i, profile) in self.outcomes.iter().enumerate() {
            if self.outcomes[..i].iter().any(|p| p.outcome == profile.outcome) {
                return Err(ConfigError::DuplicateOutcome(profile.outcome));
            }
            check_probability("item_chance", profile.item_chance)?;
            if profile.coin_multiplier < 0.0 {
                return Err(ConfigError::NonPositive { field: "coin_multiplier" });
            }
        }
        if self.profile(self.default_outcome).is_none() {
            return Err(ConfigError::MissingOutcomeProfile(self.default_outcome));
        }
        Ok(())
    }
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            outcomes: vec![
                OutcomeProfile {
                    outcome: BattleOutcome::Victory,
                    weight: 55,
                    coin_multiplier: 1.5,
                    item_chance: 0.4,
                },
                OutcomeProfile {
                    outcome: BattleOutcome::Draw,
                    weight: 25,
                    coin_multiplier: 1.0,
                    item_chance: 0.3,
                },
                OutcomeProfile {
                    outcome: BattleOutcome::Retreat,
                    weight: 20,
                    coin_multiplier: 0.8,
                    item_chance: 0.2,
                },
            ],
            default_outcome: BattleOutcome::Draw,
        }
    }
}

// ===== rewards =====

/// Rarity weights per battle outcome plus the base table used outside battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RarityTables {
    pub base: WeightTable<ItemRarity>,
    pub victory: WeightTable<ItemRarity>,
    pub draw: WeightTable<ItemRarity>,
    pub retreat: WeightTable<ItemRarity>,
}

impl RarityTables {
    pub fn for_outcome(&self, outcome: BattleOutcome) -> &WeightTable<ItemRarity> {
        match outcome {
            BattleOutcome::Victory => &self.victory,
            BattleOutcome::Draw => &self.draw,
            BattleOutcome::Retreat => &self.retreat,
        }
    }
}

impl Default for RarityTables {
    fn default() -> Self {
        use ItemRarity::*;
        Self {
            base: WeightTable::new(
                [(Common, 60), (Uncommon, 25), (Rare, 10), (Epic, 4), (Legendary, 1)],
                Common,
            ),
            victory: WeightTable::new(
                [(Common, 45), (Uncommon, 30), (Rare, 15), (Epic, 7), (Legendary, 3)],
                Common,
            ),
            draw: WeightTable::new(
                [(Common, 60), (Uncommon, 25), (Rare, 10), (Epic, 4), (Legendary, 1)],
                Common,
            ),
            retreat: WeightTable::new(
                [(Common, 72), (Uncommon, 20), (Rare, 6), (Epic, 2), (Legendary, 0)],
                Common,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardRules {
    /// Coins granted per opposing party member before the multiplier.
    pub coins_per_enemy: u64,
    /// Exclusive upper bound of the uniform coin bonus.
    pub coin_bonus_range: u64,
    /// Outcome that may drop more than one item.
    pub top_outcome: BattleOutcome,
    /// Minimum enemy count for the multi-item drop.
    pub multi_item_enemy_threshold: u32,
    /// Upper bound of the multi-item drop (inclusive).
    pub max_items: u32,
    pub rarity: RarityTables,
}

impl RewardRules {
    pub const DEFAULT_COINS_PER_ENEMY: u64 = 100;
    pub const DEFAULT_COIN_BONUS_RANGE: u64 = 200;

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items == 0 {
            return Err(ConfigError::NonPositive { field: "max_items" });
        }
        for (name, table) in [
            ("base rarity", &self.rarity.base),
            ("victory rarity", &self.rarity.victory),
            ("draw rarity", &self.rarity.draw),
            ("retreat rarity", &self.rarity.retreat),
        ] {
            if table.total_weight() == 0 {
                return Err(ConfigError::EmptyWeightTable { table: name });
            }
        }
        Ok(())
    }
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            coins_per_enemy: Self::DEFAULT_COINS_PER_ENEMY,
            coin_bonus_range: Self::DEFAULT_COIN_BONUS_RANGE,
            top_outcome: BattleOutcome::Victory,
            multi_item_enemy_threshold: 3,
            max_items: 2,
            rarity: RarityTables::default(),
        }
    }
}

// ===== capture =====

/// Base capture rate of one device type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceRate {
    /// Canonical inventory key, e.g. `"Ultra Ball"`.
    pub name: String,
    pub base_rate: f64,
    /// Additional spellings accepted on input.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aliases: Vec<String>,
}

impl DeviceRate {
    pub fn new(name: &str, base_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            base_rate,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaptureRules {
    pub devices: Vec<DeviceRate>,
    /// Base rate for a device name absent from `devices`.
    pub fallback_rate: f64,
    /// Inventory key of the auxiliary boost item.
    pub boost_item: String,
    pub boost_bonus: f64,
    /// Levels above this pivot reduce the chance.
    pub level_pivot: u32,
    pub level_penalty_step: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    /// Remaining-health fraction sampled for mid-battle captures.
    pub battle_health_min: f64,
    pub battle_health_max: f64,
    pub battle_health_factor: f64,
}

impl CaptureRules {
    pub const MIN_BASE_RATE: f64 = 0.5;
    pub const MAX_BASE_RATE: f64 = 1.0;

    fn validate(&self) -> Result<(), ConfigError> {
        for device in &self.devices {
            if !(Self::MIN_BASE_RATE..=Self::MAX_BASE_RATE).contains(&device.base_rate) {
                return Err(ConfigError::DeviceRateOutOfRange {
                    name: device.name.clone(),
                    rate: device.base_rate,
                });
            }
        }
        if !self
            .devices
            .iter()
            .any(|d| d.base_rate >= Self::MAX_BASE_RATE)
        {
            return Err(ConfigError::MissingGuaranteedDevice {
                rate: Self::MAX_BASE_RATE,
            });
        }
        if !(Self::MIN_BASE_RATE..=Self::MAX_BASE_RATE).contains(&self.fallback_rate) {
            return Err(ConfigError::DeviceRateOutOfRange {
                name: "fallback_rate".to_string(),
                rate: self.fallback_rate,
            });
        }
        check_non_negative("boost_bonus", self.boost_bonus)?;
        check_non_negative("level_penalty_step", self.level_penalty_step)?;
        check_non_negative("battle_health_factor", self.battle_health_factor)?;
        check_probability("min_chance", self.min_chance)?;
        check_probability("max_chance", self.max_chance)?;
        check_probability("battle_health_min", self.battle_health_min)?;
        check_probability("battle_health_max", self.battle_health_max)?;
        check_range("capture chance", self.min_chance, self.max_chance)?;
        check_range("battle health", self.battle_health_min, self.battle_health_max)
    }
}

impl Default for CaptureRules {
    fn default() -> Self {
        Self {
            devices: vec![
                DeviceRate::new("Poke Ball", 0.5)
                    .with_alias("poké ball")
                    .with_alias("pokéball"),
                DeviceRate::new("Great Ball", 0.65),
                DeviceRate::new("Ultra Ball", 0.8),
                DeviceRate::new("Master Ball", 1.0),
                DeviceRate::new("Premier Ball", 0.5),
                DeviceRate::new("Luxury Ball", 0.5),
                DeviceRate::new("Timer Ball", 0.6),
                DeviceRate::new("Repeat Ball", 0.7),
                DeviceRate::new("Net Ball", 0.6),
                DeviceRate::new("Dive Ball", 0.6),
            ],
            fallback_rate: 0.5,
            boost_item: "Pokepuff".to_string(),
            boost_bonus: 0.25,
            level_pivot: 10,
            level_penalty_step: 0.02,
            min_chance: 0.05,
            max_chance: 0.95,
            battle_health_min: 0.30,
            battle_health_max: 0.70,
            battle_health_factor: 0.5,
        }
    }
}

// ===== allocation =====

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocationRules {
    /// Inclusive level range rolled for each target descriptor.
    pub level_min: u32,
    pub level_max: u32,
}

impl AllocationRules {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("target level", f64::from(self.level_min), f64::from(self.level_max))
    }
}

impl Default for AllocationRules {
    fn default() -> Self {
        Self {
            level_min: 5,
            level_max: 15,
        }
    }
}

// ===== adventure completion =====

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdventureRewardRates {
    pub words_per_level: u64,
    pub words_per_coin: u64,
    pub words_per_item: u64,
}

impl AdventureRewardRates {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.words_per_level == 0 {
            return Err(ConfigError::NonPositive { field: "words_per_level" });
        }
        if self.words_per_coin == 0 {
            return Err(ConfigError::NonPositive { field: "words_per_coin" });
        }
        if self.words_per_item == 0 {
            return Err(ConfigError::NonPositive { field: "words_per_item" });
        }
        Ok(())
    }
}

impl Default for AdventureRewardRates {
    fn default() -> Self {
        Self {
            words_per_level: 50,
            words_per_coin: 1,
            words_per_item: 1000,
        }
    }
}

// ===== generation =====

/// Inclusive integer range used by generation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn roll(&self, rng: &(impl RandomSource + ?Sized)) -> u32 {
        rng.range_inclusive(self.min, self.max)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        check_range(field, f64::from(self.min), f64::from(self.max))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationRules {
    pub kind_weights: WeightTable<GeneratedKind>,
    pub wild_groups: Span,
    pub group_size: Span,
    /// Bounds applied after an area's group-size modifier.
    pub group_size_limit: Span,
    pub default_level: Span,
    pub default_agro: Span,
    /// Groups at or above this agro turn the encounter into a battle.
    pub auto_battle_agro: u32,
    pub trainer_battle_chance: f64,
    pub trainer_names: Vec<String>,
    pub trainers: Span,
    pub trainer_level: Span,
    pub battle_monsters: Span,
    /// Used when the species source produces nothing at all.
    pub fallback_species: SpeciesDescriptor,
    pub fallback_level: u32,
    pub fallback_agro: u32,
}

impl GenerationRules {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.kind_weights.total_weight() == 0 {
            return Err(ConfigError::EmptyWeightTable { table: "encounter kind" });
        }
        check_probability("trainer_battle_chance", self.trainer_battle_chance)?;
        self.wild_groups.validate("wild groups")?;
        self.group_size.validate("group size")?;
        self.group_size_limit.validate("group size limit")?;
        self.default_level.validate("default level")?;
        self.default_agro.validate("default agro")?;
        self.trainers.validate("trainers")?;
        self.trainer_level.validate("trainer level")?;
        self.battle_monsters.validate("battle monsters")
    }
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            kind_weights: WeightTable::new(
                [
                    (GeneratedKind::Battle, 30),
                    (GeneratedKind::Wild, 50),
                    (GeneratedKind::Item, 20),
                ],
                GeneratedKind::Wild,
            ),
            wild_groups: Span::new(1, 3),
            group_size: Span::new(1, 5),
            group_size_limit: Span::new(1, 10),
            default_level: Span::new(5, 25),
            default_agro: Span::new(10, 60),
            auto_battle_agro: 75,
            trainer_battle_chance: 0.6,
            trainer_names: [
                "Rival Trainer",
                "Wild Researcher",
                "Rogue Explorer",
                "Mysterious Wanderer",
                "Seasoned Adventurer",
                "Lost Traveler",
                "Treasure Hunter",
                "Monster Tamer",
            ]
            .map(String::from)
            .to_vec(),
            trainers: Span::new(1, 2),
            trainer_level: Span::new(10, 29),
            battle_monsters: Span::new(2, 4),
            fallback_species: SpeciesDescriptor::new(["Pikachu"], ["Electric"]),
            fallback_level: 10,
            fallback_agro: 25,
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvertedRange { field, min, max })
    } else {
        Ok(())
    }
}
