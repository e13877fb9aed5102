//! Data-driven encounter content and loaders.
//!
//! This crate ships the default data files under `data/` and provides
//! loaders for them:
//! - Encounter rules and tunables (TOML)
//! - Reward item catalog (RON)
//! - Seed fixtures: species, accounts, trainers, inventories, encounters (RON)
//!
//! Content is consumed by the runtime's oracles and in-memory stores and
//! never appears in encounter state on its own.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AccountFixture, AdventureFixture, ConfigLoader, ContentFactory, FixtureLoader, Fixtures,
    InventoryFixture, ItemCatalog, ItemLoader, TrainerFixture,
};
