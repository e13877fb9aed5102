//! In-memory creature factory and reward ledger.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use encounter_core::{RewardBundle, UserId};

use crate::repository::{
    CreatedCreature, CreatureFactory, CreatureSpec, RepositoryError, Result, RewardDistributor,
    RewardSource, TrainerId,
};

/// Assigns sequential ids and keeps every created creature.
pub struct InMemoryCreatureFactory {
    next_id: AtomicU64,
    created: RwLock<Vec<(CreatedCreature, CreatureSpec)>>,
}

impl InMemoryCreatureFactory {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            created: RwLock::new(Vec::new()),
        }
    }

    pub fn created(&self) -> Result<Vec<CreatedCreature>> {
        let created = self
            .created
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(created.iter().map(|(creature, _)| creature.clone()).collect())
    }
}

impl Default for InMemoryCreatureFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreatureFactory for InMemoryCreatureFactory {
    async fn initialize_and_create(
        &self,
        spec: CreatureSpec,
        owner: TrainerId,
    ) -> Result<CreatedCreature> {
        let creature = CreatedCreature {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            owner,
            species: spec.species.clone(),
            level: spec.level,
        };

        let mut created = self
            .created
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        created.push((creature.clone(), spec));
        Ok(creature)
    }
}

/// One reward hand-off seen by [`RecordingRewardDistributor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub rewards: RewardBundle,
    pub recipients: Vec<UserId>,
    pub source: RewardSource,
}

/// Reward distributor that records deliveries instead of crediting a ledger.
pub struct RecordingRewardDistributor {
    deliveries: RwLock<Vec<Delivery>>,
}

impl RecordingRewardDistributor {
    pub fn new() -> Self {
        Self {
            deliveries: RwLock::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Result<Vec<Delivery>> {
        let deliveries = self
            .deliveries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(deliveries.clone())
    }
}

impl Default for RecordingRewardDistributor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewardDistributor for RecordingRewardDistributor {
    async fn distribute(
        &self,
        rewards: &RewardBundle,
        recipients: &[UserId],
        source: &RewardSource,
    ) -> Result<()> {
        let mut deliveries = self
            .deliveries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        deliveries.push(Delivery {
            rewards: rewards.clone(),
            recipients: recipients.to_vec(),
            source: source.clone(),
        });
        Ok(())
    }
}
