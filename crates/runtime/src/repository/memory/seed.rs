//! Builds a full set of in-memory stores from content fixtures.

use std::sync::Arc;

use encounter_content::{Fixtures, InventoryFixture};

use super::{
    InMemoryCreatureFactory, InMemoryEncounterRepo, InMemoryIdentityResolver,
    InMemoryInventoryRepo, InMemoryParticipants, RecordingRewardDistributor,
};
use crate::repository::{AccountId, Inventory, Result, TrainerId};

/// Every in-memory collaborator, shared behind `Arc`s.
#[derive(Clone)]
pub struct MemoryStores {
    pub encounters: Arc<InMemoryEncounterRepo>,
    pub inventory: Arc<InMemoryInventoryRepo>,
    pub identities: Arc<InMemoryIdentityResolver>,
    pub participants: Arc<InMemoryParticipants>,
    pub creatures: Arc<InMemoryCreatureFactory>,
    pub rewards: Arc<RecordingRewardDistributor>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self {
            encounters: Arc::new(InMemoryEncounterRepo::new()),
            inventory: Arc::new(InMemoryInventoryRepo::new()),
            identities: Arc::new(InMemoryIdentityResolver::new()),
            participants: Arc::new(InMemoryParticipants::new()),
            creatures: Arc::new(InMemoryCreatureFactory::new()),
            rewards: Arc::new(RecordingRewardDistributor::new()),
        }
    }

    pub fn from_fixtures(fixtures: &Fixtures) -> Result<Self> {
        let stores = Self::new();

        for account in &fixtures.accounts {
            let account_id = AccountId(account.account_id);
            stores
                .identities
                .register_account(account.user.clone(), account_id)?;
            for trainer in &account.trainers {
                let trainer_id = TrainerId(trainer.id);
                stores
                    .identities
                    .register_trainer(account_id, trainer_id, &trainer.name)?;
                stores
                    .inventory
                    .set(trainer_id, inventory_from(&trainer.inventory))?;
            }
        }

        for adventure in &fixtures.adventures {
            stores
                .participants
                .set(adventure.id, adventure.participants.clone())?;
        }

        for encounter in &fixtures.encounters {
            stores.encounters.insert(encounter.clone())?;
        }

        Ok(stores)
    }
}

impl Default for MemoryStores {
    fn default() -> Self {
        Self::new()
    }
}

fn inventory_from(fixture: &InventoryFixture) -> Inventory {
    Inventory {
        balls: fixture.balls.clone(),
        items: fixture.items.clone(),
        berries: fixture.berries.clone(),
    }
}
