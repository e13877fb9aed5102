//! Battle resolution path.

use encounter_core::{Encounter, EncounterId, EncounterPayload, UserId};

use super::ResolutionCoordinator;
use crate::api::{BattleResolution, PartialFailure, ResolutionError, Result};
use crate::events::BattleEvent;
use crate::repository::RewardSource;

impl ResolutionCoordinator {
    /// Rolls the outcome of a battle encounter and distributes its rewards.
    ///
    /// Exactly one of any number of concurrent calls for the same id wins the
    /// repository's `mark_resolved` flip; every other call fails with
    /// [`ResolutionError::AlreadyResolved`] and distributes nothing. Rewards
    /// are computed before the flip so a catalog misconfiguration leaves the
    /// encounter open.
    pub async fn resolve_battle(
        &self,
        id: EncounterId,
        requester: &UserId,
    ) -> Result<BattleResolution> {
        let encounter = self.load(id).await?;
        let EncounterPayload::Battle(battle) = &encounter.payload else {
            return Err(ResolutionError::validation(format!(
                "{id} is a {} encounter, not a battle",
                encounter.kind()
            )));
        };
        if encounter.resolved {
            return Err(ResolutionError::AlreadyResolved(id));
        }

        let enemy_count = battle.enemy_count();
        let outcome = self.battle_rules.roll_outcome(self.rng.as_ref());
        let catalog = self.items.all_items();
        let rewards =
            self.calculator
                .battle_rewards(outcome, enemy_count, &catalog, self.rng.as_ref())?;
        tracing::debug!(
            "{} rolled {} against {} enemies: {} coins, {} items",
            id,
            outcome,
            enemy_count,
            rewards.coins,
            rewards.items.len()
        );
        let fallbacks = rewards.fallback_count();
        if fallbacks > 0 {
            tracing::warn!(
                "{} of {} items for {} came from the whole catalog; no item matched the rolled rarity",
                fallbacks,
                rewards.items.len(),
                id
            );
        }

        let recipients = self.recipients(&encounter, requester).await?;

        if !self.encounters.mark_resolved(id).await? {
            tracing::debug!("{} lost the resolution race for {}", requester, id);
            return Err(ResolutionError::AlreadyResolved(id));
        }

        let source = RewardSource {
            encounter: id,
            adventure: encounter.adventure,
            outcome,
            resolved_by: requester.clone(),
        };
        if let Err(err) = self
            .rewards
            .distribute(&rewards, &recipients, &source)
            .await
        {
            tracing::error!(
                "{} resolved as {} but reward delivery failed: {}",
                id,
                outcome,
                err
            );
            return Err(ResolutionError::PartialFailure {
                encounter: id,
                failure: PartialFailure::UndeliveredRewards { rewards },
                source: err,
            });
        }

        tracing::info!(
            "{} resolved by {} as {} ({} coins, {} items, {} recipients)",
            id,
            requester,
            outcome,
            rewards.coins,
            rewards.items.len(),
            recipients.len()
        );
        self.events.publish(BattleEvent::BattleResolved {
            encounter: id,
            outcome,
            coins: rewards.coins,
            items: rewards.items.len(),
            resolved_by: requester.clone(),
        });

        Ok(BattleResolution {
            encounter: id,
            outcome,
            rewards,
            resolved_by: requester.clone(),
            recipients,
        })
    }

    /// Adventure participants, or the requester alone when none are listed.
    async fn recipients(&self, encounter: &Encounter, requester: &UserId) -> Result<Vec<UserId>> {
        let mut recipients = match &self.participants {
            Some(directory) => directory.participants(encounter.adventure).await?,
            None => Vec::new(),
        };
        if recipients.is_empty() {
            recipients.push(requester.clone());
        }
        Ok(recipients)
    }
}
