//! Reward Calculator.
//!
//! Battle rewards:
//!
//! ```text
//! coins = floor((enemy_count * coins_per_enemy + below(coin_bonus_range)) * multiplier)
//! drop  = chance(item_chance)
//! slots = 1..=max_items  when outcome == top_outcome && enemy_count >= threshold
//!         1              otherwise
//! ```
//!
//! Each slot rolls a rarity from the outcome's table and picks uniformly
//! among catalog items of that rarity. When no item carries the rolled
//! rarity the pick falls back to the whole catalog and the returned item is
//! flagged with `fallback = true`.
//!
//! Draw order is fixed (coin bonus, drop trial, slot count, then rarity and
//! pick per slot) so scripted sources reproduce a bundle exactly.

use thiserror::Error;

use crate::config::{AdventureRewardRates, BattleRules, EncounterConfig, RewardRules};
use crate::env::{CatalogItem, ItemId, RandomSource};
use crate::error::{EngineError, ErrorSeverity};
use crate::outcome::{BattleOutcome, ItemRarity};
use crate::roll::WeightTable;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("item catalog is empty")]
    EmptyCatalog,

    #[error("no reward profile configured for outcome {0}")]
    UnknownOutcome(BattleOutcome),
}

impl EngineError for RewardError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}

/// One item granted by a reward roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardItem {
    pub id: ItemId,
    pub name: String,
    pub rarity: Option<ItemRarity>,
    pub quantity: u32,
    /// Picked from the whole catalog because the rolled rarity had no items.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fallback: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardBundle {
    pub coins: u64,
    pub items: Vec<RewardItem>,
}

impl RewardBundle {
    pub fn is_empty(&self) -> bool {
        self.coins == 0 && self.items.is_empty()
    }

    /// Number of items that came through the any-item fallback.
    pub fn fallback_count(&self) -> usize {
        self.items.iter().filter(|item| item.fallback).count()
    }
}

/// Adventure completion rewards for one participant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantRewards {
    pub word_count: u64,
    pub levels: u64,
    pub coins: u64,
    pub items: Vec<RewardItem>,
}

/// Result of a single rarity roll and catalog pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPick<'a> {
    pub item: &'a CatalogItem,
    pub rolled: ItemRarity,
    pub fallback: bool,
}

impl ItemPick<'_> {
    fn into_reward(self) -> RewardItem {
        RewardItem {
            id: self.item.id,
            name: self.item.name.clone(),
            rarity: self.item.rarity(),
            quantity: 1,
            fallback: self.fallback,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RewardCalculator {
    rewards: RewardRules,
    battle: BattleRules,
    adventure: AdventureRewardRates,
}

impl RewardCalculator {
    pub fn new(rewards: RewardRules, battle: BattleRules, adventure: AdventureRewardRates) -> Self {
        Self {
            rewards,
            battle,
            adventure,
        }
    }

    pub fn from_config(config: &EncounterConfig) -> Self {
        Self::new(
            config.rewards.clone(),
            config.battle.clone(),
            config.adventure.clone(),
        )
    }

    /// Coins and items for a resolved battle.
    pub fn battle_rewards(
        &self,
        outcome: BattleOutcome,
        enemy_count: u32,
        catalog: &[CatalogItem],
        rng: &(impl RandomSource + ?Sized),
    ) -> Result<RewardBundle, RewardError> {
        if catalog.is_empty() {
            return Err(RewardError::EmptyCatalog);
        }
        let profile = self
            .battle
            .profile(outcome)
            .ok_or(RewardError::UnknownOutcome(outcome))?;

        let base = u64::from(enemy_count) * self.rewards.coins_per_enemy
            + rng.below(self.rewards.coin_bonus_range);
        let coins = (base as f64 * profile.coin_multiplier).floor().max(0.0) as u64;

        let mut items = Vec::new();
        if rng.chance(profile.item_chance) {
            let slots = if outcome == self.rewards.top_outcome
                && enemy_count >= self.rewards.multi_item_enemy_threshold
            {
                rng.range_inclusive(1, self.rewards.max_items)
            } else {
                1
            };
            let table = self.rewards.rarity.for_outcome(outcome);
            for _ in 0..slots {
                items.push(Self::pick_item(table, catalog, rng)?.into_reward());
            }
        }

        Ok(RewardBundle { coins, items })
    }

    /// Word-count based rewards for one adventure participant.
    ///
    /// The catalog is only consulted when at least one item is owed.
    pub fn participant_rewards(
        &self,
        word_count: u64,
        catalog: &[CatalogItem],
        rng: &(impl RandomSource + ?Sized),
    ) -> Result<ParticipantRewards, RewardError> {
        let rates = &self.adventure;
        let item_count = word_count / rates.words_per_item.max(1);
        let items = (0..item_count)
            .map(|_| Self::pick_item(&self.rewards.rarity.base, catalog, rng).map(ItemPick::into_reward))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParticipantRewards {
            word_count,
            levels: word_count / rates.words_per_level.max(1),
            coins: word_count / rates.words_per_coin.max(1),
            items,
        })
    }

    /// Rolls a rarity from `table` and picks a matching catalog item.
    pub fn pick_item<'a>(
        table: &WeightTable<ItemRarity>,
        catalog: &'a [CatalogItem],
        rng: &(impl RandomSource + ?Sized),
    ) -> Result<ItemPick<'a>, RewardError> {
        if catalog.is_empty() {
            return Err(RewardError::EmptyCatalog);
        }
        let rolled = table.roll(rng);
        let matching: Vec<&CatalogItem> = catalog
            .iter()
            .filter(|item| item.rarity() == Some(rolled))
            .collect();

        let pick = if matching.is_empty() {
            ItemPick {
                item: &catalog[rng.below(catalog.len() as u64) as usize],
                rolled,
                fallback: true,
            }
        } else {
            ItemPick {
                item: matching[rng.below(matching.len() as u64) as usize],
                rolled,
                fallback: false,
            }
        };
        Ok(pick)
    }
}
