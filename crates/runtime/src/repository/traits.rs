//! Collaborator contracts the Resolution Coordinator depends on.
//!
//! All calls may suspend on I/O. Implementations must be safe to share across
//! concurrently running resolution requests.

use async_trait::async_trait;
use encounter_core::{AdventureId, Encounter, EncounterId, EncounterPayload, RewardBundle, UserId};

use super::error::Result;
use super::types::{
    Account, AccountId, CreatedCreature, CreatureSpec, Inventory, InventoryCategory,
    RewardSource, Trainer, TrainerId, UpdateOutcome,
};

/// Store of encounter records.
///
/// # Atomicity
///
/// Both mutating calls are atomic with respect to every other mutation of the
/// same id:
///
/// - [`update_payload`](Self::update_payload) is a compare-and-swap on
///   `version`. It applies only when the stored version equals
///   `expected_version` and the record is unresolved, bumping the version.
/// - [`mark_resolved`](Self::mark_resolved) is a conditional
///   `false → true` flip. Exactly one of any number of concurrent callers
///   observes `true`.
#[async_trait]
pub trait EncounterRepository: Send + Sync {
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>>;

    async fn update_payload(
        &self,
        id: EncounterId,
        expected_version: u64,
        payload: EncounterPayload,
    ) -> Result<UpdateOutcome>;

    /// Returns `true` when this call performed the transition.
    async fn mark_resolved(&self, id: EncounterId) -> Result<bool>;
}

/// Consumable holdings per trainer.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn inventory(&self, trainer: TrainerId) -> Result<Inventory>;

    /// Applies `delta` to one entry and returns the new quantity.
    ///
    /// Fails with [`InsufficientQuantity`](super::RepositoryError::InsufficientQuantity)
    /// rather than going negative.
    async fn adjust(
        &self,
        trainer: TrainerId,
        category: InventoryCategory,
        key: &str,
        delta: i64,
    ) -> Result<u32>;
}

/// Maps platform users to accounts and their named trainers.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn account(&self, user: &UserId) -> Result<Option<Account>>;

    async fn trainers(&self, account: AccountId) -> Result<Vec<Trainer>>;
}

/// Initializes and persists captured creatures.
#[async_trait]
pub trait CreatureFactory: Send + Sync {
    async fn initialize_and_create(
        &self,
        spec: CreatureSpec,
        owner: TrainerId,
    ) -> Result<CreatedCreature>;
}

/// Delivers battle rewards to participants (ledger, notification).
#[async_trait]
pub trait RewardDistributor: Send + Sync {
    async fn distribute(
        &self,
        rewards: &RewardBundle,
        recipients: &[UserId],
        source: &RewardSource,
    ) -> Result<()>;
}

/// Lists the users taking part in an adventure.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    async fn participants(&self, adventure: AdventureId) -> Result<Vec<UserId>>;
}
