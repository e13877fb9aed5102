//! Minimal [`ItemOracle`] backed by an in-memory map.
use std::collections::BTreeMap;

use encounter_core::{CatalogItem, ItemId};

/// Read-only access to the reward item catalog.
pub trait ItemOracle: Send + Sync {
    /// Every catalog entry, ordered by id.
    fn all_items(&self) -> Vec<CatalogItem>;
}

/// ItemOracle implementation with static catalog entries
#[derive(Clone, Debug, Default)]
pub struct ItemOracleImpl {
    items: BTreeMap<ItemId, CatalogItem>,
}

impl ItemOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut oracle = Self::new();
        for item in items {
            oracle.add_item(item);
        }
        oracle
    }

    /// Add a catalog entry, replacing any entry with the same id
    pub fn add_item(&mut self, item: CatalogItem) {
        self.items.insert(item.id, item);
    }
}

impl ItemOracle for ItemOracleImpl {
    fn all_items(&self) -> Vec<CatalogItem> {
        self.items.values().cloned().collect()
    }
}
