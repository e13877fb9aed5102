//! Capture Evaluator.
//!
//! ```text
//! p = base_rate(device)
//!   + boosts * boost_bonus
//!   - max(0, level - level_pivot) * level_penalty_step
//!   + (1 - health) * battle_health_factor     mid-battle only
//! p = clamp(p, min_chance, max_chance)
//! ```
//!
//! `health` is sampled uniformly from the configured remaining-health range.
//! The clamp applies to every device, so a base rate of 1.0 still yields
//! `max_chance` (0.95 by default) and a capture is never literally certain.

use crate::config::{CaptureRules, DeviceRate};
use crate::env::RandomSource;

/// Capture device after name normalisation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedDevice {
    /// Canonical inventory key, or the trimmed input for unknown devices.
    pub name: String,
    pub base_rate: f64,
    pub known: bool,
}

/// Breakdown of one capture probability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureChance {
    pub base_rate: f64,
    pub boost_bonus: f64,
    pub level_penalty: f64,
    pub battle_bonus: f64,
    /// Sampled remaining-health fraction, mid-battle only.
    pub remaining_health: Option<f64>,
    /// Clamped probability used for the roll.
    pub probability: f64,
}

impl CaptureChance {
    /// Probability as a rounded whole percent.
    pub fn percent(&self) -> u32 {
        (self.probability * 100.0).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptureRoll {
    pub chance: CaptureChance,
    pub success: bool,
}

/// Lower-cases and strips Latin diacritics.
pub fn fold_name(input: &str) -> String {
    input
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

fn compact(folded: &str) -> String {
    folded.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Clone, Debug, Default)]
pub struct CaptureEvaluator {
    rules: CaptureRules,
}

impl CaptureEvaluator {
    pub fn new(rules: CaptureRules) -> Self {
        Self { rules }
    }

    /// Maps free-form input such as `"ultraball"` or `"Poké Ball"` to a
    /// configured device.
    pub fn resolve_device(&self, input: &str) -> ResolvedDevice {
        let key = compact(&fold_name(input));
        let matches = |device: &DeviceRate| {
            std::iter::once(device.name.as_str())
                .chain(device.aliases.iter().map(String::as_str))
                .any(|name| compact(&fold_name(name)) == key)
        };

        match self.rules.devices.iter().find(|d| matches(d)) {
            Some(device) => ResolvedDevice {
                name: device.name.clone(),
                base_rate: device.base_rate,
                known: true,
            },
            None => ResolvedDevice {
                name: input.trim().to_string(),
                base_rate: self.rules.fallback_rate,
                known: false,
            },
        }
    }

    /// Whether `item` names the configured boost item.
    pub fn is_boost_item(&self, item: &str) -> bool {
        compact(&fold_name(item)) == compact(&fold_name(&self.rules.boost_item))
    }

    /// Computes the clamped capture probability.
    ///
    /// Draws from `rng` only for mid-battle attempts.
    pub fn chance(
        &self,
        device: &ResolvedDevice,
        boosts: u32,
        level: u32,
        mid_battle: bool,
        rng: &(impl RandomSource + ?Sized),
    ) -> CaptureChance {
        let rules = &self.rules;
        let boost_bonus = f64::from(boosts) * rules.boost_bonus;
        let level_penalty =
            f64::from(level.saturating_sub(rules.level_pivot)) * rules.level_penalty_step;

        let remaining_health =
            mid_battle.then(|| rng.uniform(rules.battle_health_min, rules.battle_health_max));
        let battle_bonus = remaining_health
            .map(|health| (1.0 - health) * rules.battle_health_factor)
            .unwrap_or(0.0);

        let raw = device.base_rate + boost_bonus - level_penalty + battle_bonus;
        CaptureChance {
            base_rate: device.base_rate,
            boost_bonus,
            level_penalty,
            battle_bonus,
            remaining_health,
            probability: raw.clamp(rules.min_chance, rules.max_chance),
        }
    }

    /// Computes the chance and performs the single success trial.
    pub fn evaluate(
        &self,
        device: &ResolvedDevice,
        boosts: u32,
        level: u32,
        mid_battle: bool,
        rng: &(impl RandomSource + ?Sized),
    ) -> CaptureRoll {
        let chance = self.chance(device, boosts, level, mid_battle, rng);
        let success = rng.chance(chance.probability);
        CaptureRoll { chance, success }
    }
}
