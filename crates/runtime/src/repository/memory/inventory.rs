//! In-memory trainer inventories.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::repository::{
    Inventory, InventoryCategory, InventoryRepository, RepositoryError, Result, TrainerId,
};

/// In-memory inventory repository for testing and development.
///
/// Unknown trainers hold an empty inventory.
pub struct InMemoryInventoryRepo {
    inventories: RwLock<HashMap<TrainerId, Inventory>>,
}

impl InMemoryInventoryRepo {
    pub fn new() -> Self {
        Self {
            inventories: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, trainer: TrainerId, inventory: Inventory) -> Result<()> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        inventories.insert(trainer, inventory);
        Ok(())
    }
}

impl Default for InMemoryInventoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepo {
    async fn inventory(&self, trainer: TrainerId) -> Result<Inventory> {
        let inventories = self
            .inventories
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(inventories.get(&trainer).cloned().unwrap_or_default())
    }

    async fn adjust(
        &self,
        trainer: TrainerId,
        category: InventoryCategory,
        key: &str,
        delta: i64,
    ) -> Result<u32> {
        let mut inventories = self
            .inventories
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let entries = inventories.entry(trainer).or_default().category_mut(category);
        let current = entries.get(key).copied().unwrap_or(0);
        let next = i64::from(current) + delta;
        if next < 0 {
            return Err(RepositoryError::InsufficientQuantity {
                key: key.to_string(),
                available: current,
                requested: u32::try_from(-delta).unwrap_or(u32::MAX),
            });
        }

        let next = u32::try_from(next).unwrap_or(u32::MAX);
        if next == 0 {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), next);
        }
        Ok(next)
    }
}
