//! Probability Roller: weighted selection over small discrete outcome sets.
//!
//! # Algorithm
//!
//! ```text
//! draw       = unit * total_weight            unit ∈ [0, 1)
//! cumulative = Σ weight(entry) in table order
//! result     = first entry with cumulative >= draw
//! ```
//!
//! Entries with zero weight are skipped, so a label weighted 0 is never
//! produced even when the draw lands exactly on a cumulative boundary. When
//! no entry matches (all weights zero, or floating-point slack at the upper
//! bound) the table's explicit default is returned.

use crate::env::RandomSource;

/// One labelled weight in a [`WeightTable`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightEntry<L> {
    pub label: L,
    pub weight: u32,
}

impl<L> WeightEntry<L> {
    pub const fn new(label: L, weight: u32) -> Self {
        Self { label, weight }
    }
}

/// Ordered weight mapping with an explicit fallback label.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightTable<L> {
    pub entries: Vec<WeightEntry<L>>,
    pub default: L,
}

impl<L: Clone + PartialEq> WeightTable<L> {
    pub fn new(entries: impl IntoIterator<Item = (L, u32)>, default: L) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, weight)| WeightEntry::new(label, weight))
                .collect(),
            default,
        }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// Weight configured for `label` (0 when absent).
    pub fn weight_of(&self, label: &L) -> u32 {
        self.entries
            .iter()
            .filter(|e| &e.label == label)
            .map(|e| e.weight)
            .sum()
    }

    /// Labels that can actually be produced by a roll.
    pub fn reachable_labels(&self) -> impl Iterator<Item = &L> {
        self.entries.iter().filter(|e| e.weight > 0).map(|e| &e.label)
    }

    /// Rolls one label using a fresh draw from `rng`.
    pub fn roll(&self, rng: &(impl RandomSource + ?Sized)) -> L {
        self.pick(rng.next_unit())
    }

    /// Resolves a unit draw in `[0, 1)` to a label.
    ///
    /// Exposed separately from [`roll`](Self::roll) so boundary behaviour can
    /// be exercised with exact draws.
    pub fn pick(&self, unit: f64) -> L {
        let total = self.total_weight();
        if total == 0 {
            return self.default.clone();
        }

        let draw = unit.max(0.0) * total as f64;
        let mut cumulative = 0.0;
        for entry in self.entries.iter().filter(|e| e.weight > 0) {
            cumulative += f64::from(entry.weight);
            if cumulative >= draw {
                return entry.label.clone();
            }
        }

        self.default.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SeededRandom;
    use std::collections::HashMap;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Coin {
        Heads,
        Tails,
        Edge,
    }

    fn table() -> WeightTable<Coin> {
        WeightTable::new([(Coin::Heads, 3), (Coin::Tails, 1)], Coin::Edge)
    }

    #[test]
    fn boundaries_follow_cumulative_order() {
        let t = table();
        assert_eq!(t.pick(0.0), Coin::Heads);
        // draw 3.0 equals the first cumulative sum
        assert_eq!(t.pick(0.75), Coin::Heads);
        assert_eq!(t.pick(0.7500001), Coin::Tails);
        assert_eq!(t.pick(0.999_999), Coin::Tails);
    }

    #[test]
    fn overshoot_falls_back_to_default() {
        assert_eq!(table().pick(1.5), Coin::Edge);
    }

    #[test]
    fn zero_total_returns_default() {
        let t = WeightTable::new([(Coin::Heads, 0), (Coin::Tails, 0)], Coin::Edge);
        assert_eq!(t.pick(0.0), Coin::Edge);
        assert_eq!(t.pick(0.5), Coin::Edge);
    }

    #[test]
    fn zero_weight_label_is_never_selected() {
        let t = WeightTable::new([(Coin::Edge, 0), (Coin::Heads, 1)], Coin::Tails);
        assert_eq!(t.pick(0.0), Coin::Heads);
        assert_eq!(t.reachable_labels().copied().collect::<Vec<_>>(), vec![Coin::Heads]);
    }

    #[test]
    fn frequencies_converge_to_weights() {
        let t = WeightTable::new(
            [(Coin::Heads, 60), (Coin::Tails, 30), (Coin::Edge, 10)],
            Coin::Heads,
        );
        let rng = SeededRandom::new(0xC0FFEE);
        let trials = 100_000;
        let mut counts: HashMap<Coin, u32> = HashMap::new();
        for _ in 0..trials {
            *counts.entry(t.roll(&rng)).or_default() += 1;
        }

        for (coin, weight) in [(Coin::Heads, 60.0), (Coin::Tails, 30.0), (Coin::Edge, 10.0)] {
            let observed = f64::from(counts[&coin]) / f64::from(trials);
            let expected = weight / 100.0;
            assert!(
                (observed - expected).abs() < 0.01,
                "{coin:?}: observed {observed}, expected {expected}"
            );
        }
    }
}
