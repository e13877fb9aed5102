//! Async orchestration for encounter resolution.
//!
//! This crate wires the pure rules of `encounter-core` to the collaborators
//! that hold shared state: encounter records, inventories, identities,
//! creature creation, and reward delivery. Request handlers embed a
//! [`ResolutionCoordinator`] and call
//! [`resolve_battle`](ResolutionCoordinator::resolve_battle) or
//! [`attempt_capture`](ResolutionCoordinator::attempt_capture).
//!
//! Modules are organized by responsibility:
//! - [`coordinator`] hosts the Resolution Coordinator and its builder
//! - [`api`] exposes requests, results, and the error taxonomy
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod oracle;
pub mod repository;

pub use api::{
    BattleResolution, CaptureOutcome, CaptureReport, CaptureRequest, PartialFailure,
    ResolutionError, Result, SpentConsumables,
};
pub use config::RuntimeConfig;
pub use coordinator::{CoordinatorBuilder, ResolutionCoordinator};
pub use events::{BattleEvent, CaptureEvent, Event, EventBus, Topic};
pub use oracle::{ItemOracle, ItemOracleImpl};
pub use repository::{
    Account, AccountId, CreatedCreature, CreatureFactory, CreatureSpec, Delivery,
    EncounterRepository, IdentityResolver, InMemoryCreatureFactory, InMemoryEncounterRepo,
    InMemoryIdentityResolver, InMemoryInventoryRepo, InMemoryParticipants, Inventory,
    InventoryCategory, InventoryRepository, MemoryStores, ParticipantDirectory,
    RecordingRewardDistributor, RepositoryError, RewardDistributor, RewardSource, Trainer,
    TrainerId, UpdateOutcome,
};
