//! Repository layer for dynamic encounter data.
//!
//! Repositories handle data that CHANGES while encounters resolve:
//! - Encounter records (group availability, resolution flag)
//! - Trainer inventories
//! - Created creatures and delivered rewards
//!
//! Static content (the item catalog) is handled by oracles, not repositories.

mod error;
mod traits;
mod types;

pub mod memory;

pub use error::{RepositoryError, Result};
pub use memory::{
    Delivery, InMemoryCreatureFactory, InMemoryEncounterRepo, InMemoryIdentityResolver,
    InMemoryInventoryRepo, InMemoryParticipants, MemoryStores, RecordingRewardDistributor,
};
pub use traits::{
    CreatureFactory, EncounterRepository, IdentityResolver, InventoryRepository,
    ParticipantDirectory, RewardDistributor,
};
pub use types::{
    Account, AccountId, CreatedCreature, CreatureSpec, Inventory, InventoryCategory,
    RewardSource, Trainer, TrainerId, UpdateOutcome,
};
