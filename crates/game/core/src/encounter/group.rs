use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{SpeciesDescriptor, UserId};
use crate::error::{EngineError, ErrorSeverity};

/// One successful capture from a group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureRecord {
    pub requester: UserId,
    pub captured_at: DateTime<Utc>,
}

/// Reasons a capture cannot be recorded against a group.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("group {index} does not exist (encounter has {len} groups)")]
    GroupOutOfRange { index: usize, len: usize },

    #[error("group {index} has no monsters left")]
    NoneAvailable { index: usize },

    #[error("{requester} already captured every monster they may claim from group {index}")]
    UserQuotaExhausted { index: usize, requester: UserId },
}

impl EngineError for GroupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::GroupOutOfRange { .. } => ErrorSeverity::Internal,
            Self::NoneAvailable { .. } | Self::UserQuotaExhausted { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }
}

/// A sub-population of same-species monsters in a wild encounter.
///
/// # Invariants
///
/// - `available` never increases and starts at or below `count`
/// - each successful capture appends exactly one record and decrements
///   `available` exactly once, so `available + captured.len() <= count`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterGroup {
    pub species: SpeciesDescriptor,
    pub count: u32,
    pub available: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub captured: Vec<CaptureRecord>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub agro: Option<u32>,
}

impl MonsterGroup {
    /// Fresh group with every monster available.
    pub fn new(species: SpeciesDescriptor, count: u32) -> Self {
        Self {
            species,
            count,
            available: count,
            captured: Vec::new(),
            level: None,
            agro: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_agro(mut self, agro: u32) -> Self {
        self.agro = Some(agro);
        self
    }

    /// Captures attributed to `requester`.
    pub fn captured_by(&self, requester: &UserId) -> u32 {
        self.captured
            .iter()
            .filter(|record| &record.requester == requester)
            .count() as u32
    }

    /// How many monsters of this group `requester` may still claim.
    ///
    /// Bounded by `count`, independent of the global `available` counter.
    pub fn remaining_for(&self, requester: &UserId) -> u32 {
        self.count.saturating_sub(self.captured_by(requester))
    }

    /// Appends a capture record and consumes one available monster.
    ///
    /// Leaves the group untouched on error.
    pub fn record_capture(
        &mut self,
        index: usize,
        requester: &UserId,
        captured_at: DateTime<Utc>,
    ) -> Result<(), GroupError> {
        if self.available == 0 {
            return Err(GroupError::NoneAvailable { index });
        }
        if self.remaining_for(requester) == 0 {
            return Err(GroupError::UserQuotaExhausted {
                index,
                requester: requester.clone(),
            });
        }
        self.captured.push(CaptureRecord {
            requester: requester.clone(),
            captured_at,
        });
        self.available -= 1;
        Ok(())
    }
}

/// Payload of a wild encounter: groups in storage order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WildEncounter {
    pub groups: Vec<MonsterGroup>,
}

/// Records a capture against `groups[index]`.
pub fn record_group_capture(
    groups: &mut [MonsterGroup],
    index: usize,
    requester: &UserId,
    captured_at: DateTime<Utc>,
) -> Result<(), GroupError> {
    let len = groups.len();
    groups
        .get_mut(index)
        .ok_or(GroupError::GroupOutOfRange { index, len })?
        .record_capture(index, requester, captured_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(count: u32) -> MonsterGroup {
        MonsterGroup::new(SpeciesDescriptor::new(["Mareep"], ["Electric"]), count)
    }

    #[test]
    fn capture_appends_and_decrements_once() {
        let alice = UserId::from("alice");
        let mut g = group(2);
        g.record_capture(0, &alice, Utc::now()).unwrap();
        assert_eq!(g.available, 1);
        assert_eq!(g.captured.len(), 1);
        assert_eq!(g.captured_by(&alice), 1);
        assert_eq!(g.remaining_for(&alice), 1);
    }

    #[test]
    fn depleted_group_is_left_untouched() {
        let alice = UserId::from("alice");
        let mut g = group(1);
        g.available = 0;
        let before = g.clone();
        assert_eq!(
            g.record_capture(4, &alice, Utc::now()),
            Err(GroupError::NoneAvailable { index: 4 })
        );
        assert_eq!(g, before);
    }

    #[test]
    fn per_user_quota_is_independent_of_availability() {
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");
        let mut g = group(1);
        // Stored data may carry more availability than the user may claim.
        g.available = 3;
        g.record_capture(0, &alice, Utc::now()).unwrap();
        assert!(matches!(
            g.record_capture(0, &alice, Utc::now()),
            Err(GroupError::UserQuotaExhausted { .. })
        ));
        assert_eq!(g.remaining_for(&bob), 1);
    }

    #[test]
    fn out_of_range_group_is_reported() {
        let mut groups = vec![group(1)];
        assert_eq!(
            record_group_capture(&mut groups, 3, &UserId::from("a"), Utc::now()),
            Err(GroupError::GroupOutOfRange { index: 3, len: 1 })
        );
    }
}
