//! In-memory collaborator implementations for testing and development.

mod creature;
mod encounter;
mod identity;
mod inventory;
mod seed;

pub use creature::{Delivery, InMemoryCreatureFactory, RecordingRewardDistributor};
pub use encounter::InMemoryEncounterRepo;
pub use identity::{InMemoryIdentityResolver, InMemoryParticipants};
pub use inventory::InMemoryInventoryRepo;
pub use seed::MemoryStores;
