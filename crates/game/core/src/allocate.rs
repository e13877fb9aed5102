//! Encounter Allocator: per-requester view of the claimable monsters.
//!
//! For every group with `available > 0` the requester sees
//! `count - captured_by(requester)` targets, in storage order. A 1-based
//! index picks one of them; out-of-range indices are clamped to the nearest
//! end and the clamp is reported on the returned descriptor.

use crate::config::AllocationRules;
use crate::encounter::{MonsterGroup, SpeciesDescriptor, UserId};
use crate::env::RandomSource;

/// One claimable monster as the requester currently sees it.
///
/// Computed fresh per call; never persist or cache it across requests since
/// `available` may change in between.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetDescriptor {
    pub species: SpeciesDescriptor,
    pub level: u32,
    pub group_index: usize,
    /// Ordinal of this monster inside its group (0-based), counting the
    /// requester's earlier claims.
    pub slot: u32,
    /// 1-based position in the requester's target list.
    pub display_index: usize,
    /// Original index when the request was out of range.
    #[cfg_attr(feature = "serde", serde(default))]
    pub clamped_from: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct EncounterAllocator {
    rules: AllocationRules,
}

impl EncounterAllocator {
    pub fn new(rules: AllocationRules) -> Self {
        Self { rules }
    }

    /// Upper bound on the list [`targets`](Self::targets) returns.
    pub fn claimable_count(groups: &[MonsterGroup], requester: &UserId) -> usize {
        groups
            .iter()
            .filter(|g| g.available > 0)
            .map(|g| g.remaining_for(requester) as usize)
            .sum()
    }

    /// Expands `groups` into the requester's ordered target list.
    pub fn targets(
        &self,
        groups: &[MonsterGroup],
        requester: &UserId,
        rng: &(impl RandomSource + ?Sized),
    ) -> Vec<TargetDescriptor> {
        let mut targets = Vec::new();
        for (group_index, group) in groups.iter().enumerate() {
            if group.available == 0 {
                continue;
            }
            let claimed = group.captured_by(requester);
            for slot in claimed..group.count {
                targets.push(TargetDescriptor {
                    species: group.species.clone(),
                    level: rng.range_inclusive(self.rules.level_min, self.rules.level_max),
                    group_index,
                    slot,
                    display_index: targets.len() + 1,
                    clamped_from: None,
                });
            }
        }
        targets
    }

    /// Resolves a 1-based `index` into one target.
    ///
    /// Walks the groups by remaining count instead of expanding the list, so
    /// only the chosen target rolls a level. Returns `None` when the requester
    /// has nothing left to claim.
    pub fn select(
        &self,
        groups: &[MonsterGroup],
        requester: &UserId,
        index: usize,
        rng: &(impl RandomSource + ?Sized),
    ) -> Option<TargetDescriptor> {
        let total = Self::claimable_count(groups, requester);
        if total == 0 {
            return None;
        }
        let position = index.clamp(1, total);

        let mut skipped = 0usize;
        for (group_index, group) in groups.iter().enumerate() {
            if group.available == 0 {
                continue;
            }
            let remaining = group.remaining_for(requester) as usize;
            let offset = position - 1 - skipped;
            if offset < remaining {
                return Some(TargetDescriptor {
                    species: group.species.clone(),
                    level: rng.range_inclusive(self.rules.level_min, self.rules.level_max),
                    group_index,
                    slot: group.captured_by(requester) + offset as u32,
                    display_index: position,
                    clamped_from: (position != index).then_some(index),
                });
            }
            skipped += remaining;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::env::{SeededRandom, SequenceRandom};

    fn group(name: &str, count: u32) -> MonsterGroup {
        MonsterGroup::new(SpeciesDescriptor::new([name], ["Normal"]), count)
    }

    #[test]
    fn prior_claims_shift_the_requesters_view() {
        let alice = UserId::from("alice");
        let allocator = EncounterAllocator::default();
        let rng = SequenceRandom::constant(0.5);
        let mut groups = vec![group("Eevee", 2)];

        let first = allocator.select(&groups, &alice, 1, &rng).unwrap();
        assert_eq!((first.group_index, first.slot), (0, 0));
        groups[0].record_capture(0, &alice, Utc::now()).unwrap();
        assert_eq!(groups[0].available, 1);

        let second = allocator.select(&groups, &alice, 1, &rng).unwrap();
        assert_eq!((second.group_index, second.slot), (0, 1));
        assert_eq!(second.display_index, 1);
        assert_eq!(allocator.targets(&groups, &alice, &rng).len(), 1);
    }

    #[test]
    fn depleted_groups_are_skipped() {
        let alice = UserId::from("alice");
        let mut groups = vec![group("Oddish", 3), group("Bellsprout", 1)];
        groups[0].available = 0;
        let targets = EncounterAllocator::default().targets(&groups, &alice, &SequenceRandom::constant(0.0));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].group_index, 1);
        assert_eq!(targets[0].display_index, 1);
    }

    #[test]
    fn out_of_range_index_is_clamped_and_reported() {
        let alice = UserId::from("alice");
        let allocator = EncounterAllocator::default();
        let rng = SequenceRandom::constant(0.0);
        let groups = vec![group("Geodude", 2), group("Onix", 1)];

        let high = allocator.select(&groups, &alice, 40, &rng).unwrap();
        assert_eq!(high.display_index, 3);
        assert_eq!(high.group_index, 1);
        assert_eq!(high.clamped_from, Some(40));

        let low = allocator.select(&groups, &alice, 0, &rng).unwrap();
        assert_eq!(low.display_index, 1);
        assert_eq!(low.clamped_from, Some(0));

        let exact = allocator.select(&groups, &alice, 2, &rng).unwrap();
        assert_eq!(exact.clamped_from, None);
    }

    #[test]
    fn nothing_to_claim_is_none() {
        let alice = UserId::from("alice");
        let mut only = group("Ditto", 1);
        only.record_capture(0, &alice, Utc::now()).unwrap();
        let allocator = EncounterAllocator::default();
        assert!(allocator.select(&[only], &alice, 1, &SequenceRandom::constant(0.0)).is_none());
        assert!(allocator.select(&[], &alice, 1, &SequenceRandom::constant(0.0)).is_none());
    }

    #[test]
    fn target_count_is_bounded_and_levels_in_range() {
        let rng = SeededRandom::new(11);
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        let allocator = EncounterAllocator::default();
        let mut groups = vec![group("Pidgey", 4), group("Rattata", 2), group("Spearow", 3)];
        groups[0].record_capture(0, &alice, Utc::now()).unwrap();
        groups[0].record_capture(0, &bob, Utc::now()).unwrap();
        groups[1].available = 0;

        let targets = allocator.targets(&groups, &alice, &rng);
        assert_eq!(targets.len(), EncounterAllocator::claimable_count(&groups, &alice));
        assert_eq!(targets.len(), 3 + 3);
        assert!(targets.iter().all(|t| (5..=15).contains(&t.level)));
        assert!(
            targets
                .iter()
                .enumerate()
                .all(|(i, t)| t.display_index == i + 1)
        );
    }

    #[test]
    fn huge_groups_select_without_expanding() {
        let alice = UserId::from("alice");
        let mut swarm = group("Magikarp", u32::MAX);
        swarm.available = 1;
        let groups = vec![group("Psyduck", 2), swarm];
        let allocator = EncounterAllocator::default();
        let rng = SequenceRandom::constant(0.0);

        assert_eq!(
            EncounterAllocator::claimable_count(&groups, &alice),
            2 + u32::MAX as usize
        );

        let first = allocator.select(&groups, &alice, 3, &rng).unwrap();
        assert_eq!((first.group_index, first.slot, first.display_index), (1, 0, 3));
        assert_eq!(first.clamped_from, None);

        let last = allocator.select(&groups, &alice, usize::MAX, &rng).unwrap();
        assert_eq!(last.group_index, 1);
        assert_eq!(last.slot, u32::MAX - 1);
        assert_eq!(last.clamped_from, Some(usize::MAX));
    }

    #[test]
    fn select_agrees_with_the_listed_targets() {
        let alice = UserId::from("alice");
        let allocator = EncounterAllocator::default();
        let rng = SequenceRandom::constant(0.0);
        let mut groups = vec![group("Zubat", 3), group("Geodude", 1), group("Paras", 2)];
        groups[0].record_capture(0, &alice, Utc::now()).unwrap();
        groups[1].available = 0;

        let listed = allocator.targets(&groups, &alice, &rng);
        for expected in &listed {
            let picked = allocator
                .select(&groups, &alice, expected.display_index, &rng)
                .unwrap();
            assert_eq!(&picked, expected);
        }
    }
}
