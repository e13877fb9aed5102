//! Item catalog loader.

use std::path::Path;

use encounter_core::CatalogItem;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<CatalogItem>,
}

/// Loader for the reward item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file.
    ///
    /// An empty catalog loads fine; reward and item-encounter rolls report it
    /// when they need an item.
    pub fn load(path: &Path) -> LoadResult<Vec<CatalogItem>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }
}
