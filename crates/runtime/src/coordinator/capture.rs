//! Capture attempt path.
//!
//! ```text
//! load → eligible? → trainer → consumables held? → allocate
//!      → roll → debit → escaped | claim (CAS) → create creature
//! ```
//!
//! Nothing is debited before the roll, so `NothingToCapture` and every
//! validation failure leave the inventory untouched. After the debit, a lost
//! claim or a failed creation refunds the consumables; a failed creation
//! additionally leaves the claim in place since availability never grows.

use chrono::Utc;
use encounter_core::{
    EncounterId, EncounterKind, ResolvedDevice, TargetDescriptor, UserId, fold_name, record_group_capture,
};

use super::ResolutionCoordinator;
use crate::api::{
    CaptureOutcome, CaptureReport, CaptureRequest, PartialFailure, ResolutionError, Result,
    SpentConsumables,
};
use crate::events::CaptureEvent;
use crate::repository::{
    CreatureSpec, Inventory, InventoryCategory, RepositoryError, Trainer, TrainerId,
    UpdateOutcome,
};

/// Categories searched for non-device consumables, in order.
const ITEM_CATEGORIES: [InventoryCategory; 2] =
    [InventoryCategory::Items, InventoryCategory::Berries];

/// One inventory line to debit.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Debit {
    category: InventoryCategory,
    key: String,
    quantity: u32,
}

impl ResolutionCoordinator {
    /// Attempts to capture one monster from a wild encounter, or from a
    /// battle when the request is flagged mid-battle.
    ///
    /// Returns [`CaptureOutcome::NothingToCapture`] when the requester has no
    /// claimable target left; that is a normal result, not an error.
    pub async fn attempt_capture(&self, request: CaptureRequest) -> Result<CaptureOutcome> {
        let id = request.encounter;
        let encounter = self.load(id).await?;
        if encounter.resolved {
            return Err(ResolutionError::AlreadyResolved(id));
        }
        if !encounter.is_capture_eligible(request.mid_battle) {
            let hint = match encounter.kind() {
                EncounterKind::Battle => " outside a battle",
                _ => "",
            };
            return Err(ResolutionError::validation(format!(
                "{id} is a {} encounter and cannot be captured from{hint}",
                encounter.kind()
            )));
        }

        let trainer = self
            .trainer(&request.requester, &request.trainer_name)
            .await?;
        let device = self.evaluator.resolve_device(&request.device);
        if !device.known {
            tracing::debug!(
                "Unknown capture device {:?}; using fallback rate {}",
                device.name,
                device.base_rate
            );
        }
        let inventory = self.inventory.inventory(trainer.id).await?;
        let (debits, spent) = self.plan_debits(&inventory, &device, &request.boosts)?;

        let groups = encounter.payload.capture_groups().unwrap_or_default();
        let Some(target) = self.allocator.select(
            groups,
            &request.requester,
            request.target_index,
            self.rng.as_ref(),
        ) else {
            tracing::debug!("{} has nothing left to capture in {}", request.requester, id);
            return Ok(CaptureOutcome::NothingToCapture);
        };
        if let Some(requested) = target.clamped_from {
            tracing::debug!(
                "Target index {} clamped to {} for {}",
                requested,
                target.display_index,
                request.requester
            );
        }

        let roll = self.evaluator.evaluate(
            &device,
            spent.boost_count,
            target.level,
            request.mid_battle,
            self.rng.as_ref(),
        );
        tracing::debug!(
            "{} rolled {:.3} capture chance on {} (group {}, level {}): {}",
            request.requester,
            roll.chance.probability,
            target.species.display_name(),
            target.group_index,
            target.level,
            if roll.success { "caught" } else { "escaped" }
        );

        self.debit(trainer.id, &debits).await?;
        self.events.publish(CaptureEvent::CaptureAttempted {
            encounter: id,
            requester: request.requester.clone(),
            group_index: target.group_index,
            chance_percent: roll.chance.percent(),
            success: roll.success,
        });

        let report = CaptureReport {
            encounter: id,
            trainer,
            chance_percent: roll.chance.percent(),
            chance: roll.chance,
            target,
            spent,
        };
        if !roll.success {
            return Ok(CaptureOutcome::Escaped { report });
        }

        if let Err(err) = self
            .claim(id, &request.requester, report.target.group_index)
            .await
        {
            self.refund(report.trainer.id, &debits).await;
            return Err(err);
        }

        let spec = CreatureSpec::from_target(id, &report.target, &report.spent.device);
        match self
            .creatures
            .initialize_and_create(spec, report.trainer.id)
            .await
        {
            Ok(creature) => {
                tracing::info!(
                    "{} captured {} (creature {}) from {} group {}",
                    report.trainer.name,
                    report.target.species.display_name(),
                    creature.id,
                    id,
                    report.target.group_index
                );
                self.events.publish(CaptureEvent::CaptureCommitted {
                    encounter: id,
                    requester: request.requester,
                    group_index: report.target.group_index,
                    creature_id: creature.id,
                });
                Ok(CaptureOutcome::Captured { report, creature })
            }
            Err(err) => {
                tracing::error!(
                    "Capture by {} on {} group {} committed but creature creation failed: {}",
                    request.requester,
                    id,
                    report.target.group_index,
                    err
                );
                self.refund(report.trainer.id, &debits).await;
                Err(ResolutionError::PartialFailure {
                    encounter: id,
                    failure: PartialFailure::OrphanedCapture {
                        group_index: report.target.group_index,
                        requester: request.requester,
                    },
                    source: err,
                })
            }
        }
    }

    /// Resolves the requester's trainer by case-insensitive name.
    async fn trainer(&self, user: &UserId, name: &str) -> Result<Trainer> {
        let account = self
            .identities
            .account(user)
            .await?
            .ok_or_else(|| ResolutionError::not_found(format!("account for user {user}")))?;
        self.identities
            .trainers(account.id)
            .await?
            .into_iter()
            .find(|trainer| trainer.is_named(name))
            .ok_or_else(|| ResolutionError::not_found(format!("trainer {:?}", name.trim())))
    }

    /// Checks holdings and lists what the attempt will cost.
    fn plan_debits(
        &self,
        inventory: &Inventory,
        device: &ResolvedDevice,
        boosts: &[String],
    ) -> Result<(Vec<Debit>, SpentConsumables)> {
        let (ball_key, held) = find_key(inventory, InventoryCategory::Balls, &device.name)
            .ok_or_else(|| insufficient(&device.name, 1, 0))?;
        if held < 1 {
            return Err(insufficient(&ball_key, 1, held));
        }
        let mut debits = vec![Debit {
            category: InventoryCategory::Balls,
            key: ball_key.clone(),
            quantity: 1,
        }];

        let mut boost_count = 0;
        let mut items: Vec<(String, u32)> = Vec::new();
        for name in boosts.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
            match items.iter_mut().find(|(seen, _)| same_item(seen, name)) {
                Some((_, count)) => *count += 1,
                None => items.push((name.to_string(), 1)),
            }
            if self.evaluator.is_boost_item(name) {
                boost_count += 1;
            }
        }

        for (name, required) in &mut items {
            let (category, key, held) = ITEM_CATEGORIES
                .iter()
                .find_map(|&category| {
                    find_key(inventory, category, name.as_str())
                        .map(|(key, held)| (category, key, held))
                })
                .ok_or_else(|| insufficient(name, *required, 0))?;
            if held < *required {
                return Err(insufficient(&key, *required, held));
            }
            *name = key.clone();
            debits.push(Debit {
                category,
                key,
                quantity: *required,
            });
        }

        Ok((
            debits,
            SpentConsumables {
                device: ball_key,
                items,
                boost_count,
            },
        ))
    }

    /// Applies every debit or none of them.
    async fn debit(&self, trainer: TrainerId, debits: &[Debit]) -> Result<()> {
        for (applied, debit) in debits.iter().enumerate() {
            let delta = -i64::from(debit.quantity);
            if let Err(err) = self
                .inventory
                .adjust(trainer, debit.category, &debit.key, delta)
                .await
            {
                self.refund(trainer, &debits[..applied]).await;
                return Err(match err {
                    RepositoryError::InsufficientQuantity {
                        key,
                        available,
                        requested,
                    } => insufficient(&key, requested, available),
                    other => other.into(),
                });
            }
        }
        Ok(())
    }

    /// Returns debited consumables. Failures are logged, not raised.
    async fn refund(&self, trainer: TrainerId, debits: &[Debit]) {
        for debit in debits {
            let delta = i64::from(debit.quantity);
            match self
                .inventory
                .adjust(trainer, debit.category, &debit.key, delta)
                .await
            {
                Ok(_) => {
                    tracing::debug!("Refunded {} x{} to {}", debit.key, debit.quantity, trainer)
                }
                Err(err) => tracing::error!(
                    "Refund of {} x{} to {} failed: {}",
                    debit.key,
                    debit.quantity,
                    trainer,
                    err
                ),
            }
        }
    }

    /// Appends a capture record to the group and decrements `available` in
    /// one version-guarded write, retrying on conflict.
    async fn claim(&self, id: EncounterId, requester: &UserId, group_index: usize) -> Result<()> {
        for attempt in 1..=self.capture_retries {
            let encounter = self.load(id).await?;
            if encounter.resolved {
                return Err(ResolutionError::unavailable(format!("{id} was resolved")));
            }

            let mut payload = encounter.payload;
            let groups = payload.capture_groups_mut().ok_or_else(|| {
                ResolutionError::validation(format!("{id} no longer holds capturable groups"))
            })?;
            record_group_capture(groups, group_index, requester, Utc::now())
                .map_err(ResolutionError::unavailable)?;

            match self
                .encounters
                .update_payload(id, encounter.version, payload)
                .await?
            {
                UpdateOutcome::Applied { version } => {
                    tracing::debug!(
                        "Claim on {} group {} stored at version {}",
                        id,
                        group_index,
                        version
                    );
                    return Ok(());
                }
                UpdateOutcome::Conflict { current_version } => {
                    tracing::warn!(
                        "Capture claim on {} conflicted (read version {}, now {}), attempt {}/{}",
                        id,
                        encounter.version,
                        current_version,
                        attempt,
                        self.capture_retries
                    );
                }
            }
        }

        Err(ResolutionError::unavailable(format!(
            "{id} kept changing after {} attempts",
            self.capture_retries
        )))
    }
}

fn insufficient(item: &str, required: u32, available: u32) -> ResolutionError {
    ResolutionError::InsufficientConsumables {
        item: item.to_string(),
        required,
        available,
    }
}

/// Whitespace-, case- and accent-insensitive item name comparison.
fn same_item(a: &str, b: &str) -> bool {
    let squash = |s: &str| -> String {
        fold_name(s).chars().filter(|c| !c.is_whitespace()).collect()
    };
    squash(a) == squash(b)
}

/// Stored key and quantity for `name` in one inventory category.
fn find_key(
    inventory: &Inventory,
    category: InventoryCategory,
    name: &str,
) -> Option<(String, u32)> {
    inventory
        .category(category)
        .iter()
        .find(|(key, _)| same_item(key, name))
        .map(|(key, &held)| (key.clone(), held))
}
