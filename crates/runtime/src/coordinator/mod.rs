//! Resolution Coordinator.
//!
//! Orchestrates validation, the pure rules in `encounter-core`, and the
//! conditional writes that keep a shared encounter record consistent:
//!
//! - [`resolve_battle`](ResolutionCoordinator::resolve_battle) claims a
//!   battle through the repository's one-shot `mark_resolved` flip
//! - [`attempt_capture`](ResolutionCoordinator::attempt_capture) claims a
//!   monster through a version-guarded payload update, retried on conflict
//!
//! The coordinator is cheap to clone; every clone shares the same
//! collaborators, random source, and event bus.
mod battle;
mod builder;
mod capture;

use std::sync::Arc;

use encounter_core::{
    BattleRules, CaptureEvaluator, Encounter, EncounterAllocator, EncounterId, RandomSource,
    RewardCalculator,
};

pub use builder::CoordinatorBuilder;

use crate::api::{ResolutionError, Result};
use crate::events::EventBus;
use crate::oracle::ItemOracle;
use crate::repository::{
    CreatureFactory, EncounterRepository, IdentityResolver, InventoryRepository,
    ParticipantDirectory, RewardDistributor,
};

#[derive(Clone)]
pub struct ResolutionCoordinator {
    encounters: Arc<dyn EncounterRepository>,
    inventory: Arc<dyn InventoryRepository>,
    identities: Arc<dyn IdentityResolver>,
    creatures: Arc<dyn CreatureFactory>,
    rewards: Arc<dyn RewardDistributor>,
    participants: Option<Arc<dyn ParticipantDirectory>>,
    items: Arc<dyn ItemOracle>,
    rng: Arc<dyn RandomSource>,
    events: EventBus,

    battle_rules: BattleRules,
    calculator: RewardCalculator,
    evaluator: CaptureEvaluator,
    allocator: EncounterAllocator,
    capture_retries: u32,
}

impl ResolutionCoordinator {
    /// Create a new coordinator builder
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    /// Event bus the coordinator publishes to.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    async fn load(&self, id: EncounterId) -> Result<Encounter> {
        self.encounters
            .get(id)
            .await?
            .ok_or_else(|| ResolutionError::not_found(id))
    }
}
