use std::sync::Arc;

use encounter_core::{
    CaptureEvaluator, EncounterAllocator, RandomSource, RewardCalculator,
};

use super::ResolutionCoordinator;
use crate::api::{ResolutionError, Result};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::oracle::ItemOracle;
use crate::repository::{
    CreatureFactory, EncounterRepository, IdentityResolver, InventoryRepository, MemoryStores,
    ParticipantDirectory, RewardDistributor,
};

/// Builder for [`ResolutionCoordinator`].
///
/// Every collaborator except the participant directory is required. The
/// random source defaults to the one described by
/// [`RuntimeConfig::rng_seed`].
#[derive(Default)]
pub struct CoordinatorBuilder {
    config: RuntimeConfig,
    encounters: Option<Arc<dyn EncounterRepository>>,
    inventory: Option<Arc<dyn InventoryRepository>>,
    identities: Option<Arc<dyn IdentityResolver>>,
    creatures: Option<Arc<dyn CreatureFactory>>,
    rewards: Option<Arc<dyn RewardDistributor>>,
    participants: Option<Arc<dyn ParticipantDirectory>>,
    items: Option<Arc<dyn ItemOracle>>,
    rng: Option<Arc<dyn RandomSource>>,
    events: Option<EventBus>,
}

impl CoordinatorBuilder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encounters(mut self, repo: Arc<dyn EncounterRepository>) -> Self {
        self.encounters = Some(repo);
        self
    }

    pub fn inventory(mut self, repo: Arc<dyn InventoryRepository>) -> Self {
        self.inventory = Some(repo);
        self
    }

    pub fn identities(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.identities = Some(resolver);
        self
    }

    pub fn creatures(mut self, factory: Arc<dyn CreatureFactory>) -> Self {
        self.creatures = Some(factory);
        self
    }

    pub fn rewards(mut self, distributor: Arc<dyn RewardDistributor>) -> Self {
        self.rewards = Some(distributor);
        self
    }

    /// Set the participant directory (optional)
    ///
    /// Without one, battle rewards go to the requester alone.
    pub fn participants(mut self, directory: Arc<dyn ParticipantDirectory>) -> Self {
        self.participants = Some(directory);
        self
    }

    pub fn items(mut self, oracle: Arc<dyn ItemOracle>) -> Self {
        self.items = Some(oracle);
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Share an existing event bus instead of creating one
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Wire every repository from one set of in-memory stores.
    pub fn memory_stores(self, stores: &MemoryStores) -> Self {
        self.encounters(stores.encounters.clone())
            .inventory(stores.inventory.clone())
            .identities(stores.identities.clone())
            .creatures(stores.creatures.clone())
            .rewards(stores.rewards.clone())
            .participants(stores.participants.clone())
    }

    pub fn build(self) -> Result<ResolutionCoordinator> {
        let config = self.config;
        config.encounter.validate()?;

        let rules = &config.encounter;
        Ok(ResolutionCoordinator {
            encounters: self
                .encounters
                .ok_or(ResolutionError::MissingCollaborator("encounter repository"))?,
            inventory: self
                .inventory
                .ok_or(ResolutionError::MissingCollaborator("inventory repository"))?,
            identities: self
                .identities
                .ok_or(ResolutionError::MissingCollaborator("identity resolver"))?,
            creatures: self
                .creatures
                .ok_or(ResolutionError::MissingCollaborator("creature factory"))?,
            rewards: self
                .rewards
                .ok_or(ResolutionError::MissingCollaborator("reward distributor"))?,
            participants: self.participants,
            items: self
                .items
                .ok_or(ResolutionError::MissingCollaborator("item oracle"))?,
            rng: self.rng.unwrap_or_else(|| config.random_source()),
            events: self
                .events
                .unwrap_or_else(|| EventBus::with_capacity(config.event_buffer_size)),
            battle_rules: rules.battle.clone(),
            calculator: RewardCalculator::from_config(rules),
            evaluator: CaptureEvaluator::new(rules.capture.clone()),
            allocator: EncounterAllocator::new(rules.allocation.clone()),
            capture_retries: config.capture_retries.max(1),
        })
    }
}
