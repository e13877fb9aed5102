//! In-memory identity resolution and adventure participants.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use encounter_core::{AdventureId, UserId};

use crate::repository::{
    Account, AccountId, IdentityResolver, ParticipantDirectory, RepositoryError, Result,
    Trainer, TrainerId,
};

/// Accounts and trainers registered up front.
pub struct InMemoryIdentityResolver {
    accounts: RwLock<HashMap<UserId, Account>>,
    trainers: RwLock<HashMap<AccountId, Vec<Trainer>>>,
}

impl InMemoryIdentityResolver {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            trainers: RwLock::new(HashMap::new()),
        }
    }

    pub fn register_account(&self, user: UserId, id: AccountId) -> Result<()> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        accounts.insert(user.clone(), Account { id, user });
        Ok(())
    }

    pub fn register_trainer(&self, owner: AccountId, id: TrainerId, name: &str) -> Result<()> {
        let mut trainers = self
            .trainers
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        trainers.entry(owner).or_default().push(Trainer {
            id,
            name: name.to_string(),
            owner,
        });
        Ok(())
    }
}

impl Default for InMemoryIdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn account(&self, user: &UserId) -> Result<Option<Account>> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(accounts.get(user).cloned())
    }

    async fn trainers(&self, account: AccountId) -> Result<Vec<Trainer>> {
        let trainers = self
            .trainers
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(trainers.get(&account).cloned().unwrap_or_default())
    }
}

/// Adventure participant lists.
pub struct InMemoryParticipants {
    adventures: RwLock<HashMap<AdventureId, Vec<UserId>>>,
}

impl InMemoryParticipants {
    pub fn new() -> Self {
        Self {
            adventures: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, adventure: AdventureId, participants: Vec<UserId>) -> Result<()> {
        let mut adventures = self
            .adventures
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        adventures.insert(adventure, participants);
        Ok(())
    }
}

impl Default for InMemoryParticipants {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParticipantDirectory for InMemoryParticipants {
    async fn participants(&self, adventure: AdventureId) -> Result<Vec<UserId>> {
        let adventures = self
            .adventures
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(adventures.get(&adventure).cloned().unwrap_or_default())
    }
}
