//! Seed data for local sessions: species, accounts with their trainers and
//! inventories, adventures and pre-generated encounters.

use std::collections::BTreeMap;
use std::path::Path;

use encounter_core::{AdventureId, Encounter, SpeciesDescriptor, SpeciesPool, UserId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Consumable holdings keyed by inventory name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryFixture {
    pub balls: BTreeMap<String, u32>,
    pub items: BTreeMap<String, u32>,
    pub berries: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerFixture {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub inventory: InventoryFixture,
}

/// A chat-platform user, the internal account it links to and its trainers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFixture {
    pub user: UserId,
    pub account_id: u64,
    #[serde(default)]
    pub trainers: Vec<TrainerFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureFixture {
    pub id: AdventureId,
    #[serde(default)]
    pub participants: Vec<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub species: Vec<SpeciesDescriptor>,
    pub accounts: Vec<AccountFixture>,
    pub adventures: Vec<AdventureFixture>,
    pub encounters: Vec<Encounter>,
}

impl Fixtures {
    /// Species source for the encounter generator.
    pub fn species_pool(&self) -> SpeciesPool {
        SpeciesPool::new(self.species.clone())
    }

    pub fn account(&self, user: &UserId) -> Option<&AccountFixture> {
        self.accounts.iter().find(|a| &a.user == user)
    }
}

pub struct FixtureLoader;

impl FixtureLoader {
    pub fn load(path: &Path) -> LoadResult<Fixtures> {
        let content = read_file(path)?;
        let fixtures: Fixtures = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fixtures RON: {}", e))?;

        let mut seen = std::collections::HashSet::new();
        for encounter in &fixtures.encounters {
            if !seen.insert(encounter.id) {
                anyhow::bail!("Duplicate encounter id {} in {}", encounter.id, path.display());
            }
        }
        Ok(fixtures)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use encounter_core::EncounterKind;
    use tempfile::NamedTempFile;

    use super::*;

    const SAMPLE: &str = r#"(
        species: [(species: ["Eevee"], types: ["Normal"])],
        accounts: [
            (
                user: "1001",
                account_id: 1,
                trainers: [
                    (id: 10, name: "Ash", inventory: (balls: {"Poke Ball": 3}, items: {"Pokepuff": 1})),
                ],
            ),
        ],
        adventures: [(id: 5, participants: ["1001"])],
        encounters: [
            (
                id: 1,
                adventure: 5,
                payload: Wild((
                    groups: [(species: (species: ["Eevee"], types: ["Normal"]), count: 2, available: 2)],
                )),
            ),
            (
                id: 2,
                adventure: 5,
                payload: Battle((trainers: [(name: "Rival Trainer", level: 12)])),
            ),
        ],
    )"#;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_sample_fixtures() {
        let file = write(SAMPLE);
        let fixtures = FixtureLoader::load(file.path()).unwrap();

        let account = fixtures.account(&UserId::from("1001")).unwrap();
        assert_eq!(account.trainers[0].inventory.balls["Poke Ball"], 3);
        assert!(account.trainers[0].inventory.berries.is_empty());

        assert_eq!(fixtures.encounters.len(), 2);
        assert_eq!(fixtures.encounters[0].kind(), EncounterKind::Wild);
        assert!(!fixtures.encounters[0].resolved);
        assert_eq!(fixtures.encounters[1].kind(), EncounterKind::Battle);
        assert_eq!(fixtures.species_pool().len(), 1);
    }

    #[test]
    fn duplicate_encounter_ids_are_rejected() {
        let file = write(
            r#"(encounters: [
                (id: 1, adventure: 1, payload: Wild((groups: []))),
                (id: 1, adventure: 1, payload: Wild((groups: []))),
            ])"#,
        );
        let err = FixtureLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate encounter id"));
    }
}
