//! Content loaders for reading encounter data from files.
//!
//! TOML carries tunables (`encounter.toml`); RON carries authored content
//! (`items.ron`, `fixtures.ron`). Every loader returns [`LoadResult`] so the
//! binary can attach context and bail.

pub mod config;
pub mod factory;
pub mod fixtures;
pub mod item;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use fixtures::{
    AccountFixture, AdventureFixture, FixtureLoader, Fixtures, InventoryFixture, TrainerFixture,
};
pub use item::{ItemCatalog, ItemLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
