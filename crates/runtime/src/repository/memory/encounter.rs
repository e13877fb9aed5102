//! In-memory encounter store with version-guarded writes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use encounter_core::{Encounter, EncounterId, EncounterPayload};

use crate::repository::{EncounterRepository, RepositoryError, Result, UpdateOutcome};

/// In-memory encounter repository for testing and development.
///
/// Every mutation happens under the write lock, so the compare-and-swap and
/// the resolve flip are atomic per process. Not persistent across restarts.
pub struct InMemoryEncounterRepo {
    encounters: RwLock<HashMap<EncounterId, Encounter>>,
}

impl InMemoryEncounterRepo {
    pub fn new() -> Self {
        Self {
            encounters: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_encounters(encounters: impl IntoIterator<Item = Encounter>) -> Self {
        Self {
            encounters: RwLock::new(encounters.into_iter().map(|e| (e.id, e)).collect()),
        }
    }

    /// Inserts or replaces a record.
    pub fn insert(&self, encounter: Encounter) -> Result<()> {
        let mut encounters = self
            .encounters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        encounters.insert(encounter.id, encounter);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.encounters.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryEncounterRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EncounterRepository for InMemoryEncounterRepo {
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>> {
        let encounters = self
            .encounters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(encounters.get(&id).cloned())
    }

    async fn update_payload(
        &self,
        id: EncounterId,
        expected_version: u64,
        payload: EncounterPayload,
    ) -> Result<UpdateOutcome> {
        let mut encounters = self
            .encounters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let encounter = encounters
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if encounter.resolved || encounter.version != expected_version {
            return Ok(UpdateOutcome::Conflict {
                current_version: encounter.version,
            });
        }

        encounter.payload = payload;
        encounter.version += 1;
        Ok(UpdateOutcome::Applied {
            version: encounter.version,
        })
    }

    async fn mark_resolved(&self, id: EncounterId) -> Result<bool> {
        let mut encounters = self
            .encounters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let encounter = encounters
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if encounter.resolved {
            return Ok(false);
        }
        encounter.resolved = true;
        encounter.version += 1;
        Ok(true)
    }
}
