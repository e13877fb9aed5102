//! Shared wiring for coordinator integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use encounter_core::{
    AdventureId, CatalogItem, Encounter, ItemRarity, MonsterGroup, RandomSource,
    SpeciesDescriptor, UserId,
};
use encounter_runtime::{
    AccountId, Inventory, ItemOracleImpl, MemoryStores, ResolutionCoordinator, TrainerId,
};

pub const ASH_USER: &str = "100200300";
pub const BROCK_USER: &str = "400500600";
pub const ASH: TrainerId = TrainerId(11);
pub const BROCK: TrainerId = TrainerId(21);
pub const ADVENTURE: u64 = 1;

pub fn group(name: &str, count: u32) -> MonsterGroup {
    MonsterGroup::new(SpeciesDescriptor::new([name], ["Normal"]), count)
}

pub fn catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new(1, "Potion", Some(ItemRarity::Common)),
        CatalogItem::new(2, "Super Potion", Some(ItemRarity::Uncommon)),
        CatalogItem::new(3, "Rare Candy", Some(ItemRarity::Rare)),
    ]
}

fn ash_inventory() -> Inventory {
    let mut inventory = Inventory::default();
    inventory.balls.insert("Poke Ball".to_string(), 5);
    inventory.balls.insert("Master Ball".to_string(), 1);
    inventory.items.insert("Pokepuff".to_string(), 3);
    inventory.berries.insert("Oran Berry".to_string(), 1);
    inventory
}

fn brock_inventory() -> Inventory {
    let mut inventory = Inventory::default();
    inventory.balls.insert("Poke Ball".to_string(), 10);
    inventory
}

/// Two users in one adventure, each with one trainer.
pub fn stores(encounters: impl IntoIterator<Item = Encounter>) -> MemoryStores {
    let stores = MemoryStores::new();
    let ids = &stores.identities;
    ids.register_account(UserId::from(ASH_USER), AccountId(1))
        .expect("register ash");
    ids.register_trainer(AccountId(1), ASH, "Ash").expect("ash");
    ids.register_account(UserId::from(BROCK_USER), AccountId(2))
        .expect("register brock");
    ids.register_trainer(AccountId(2), BROCK, "Brock").expect("brock");

    stores.inventory.set(ASH, ash_inventory()).expect("ash inventory");
    stores
        .inventory
        .set(BROCK, brock_inventory())
        .expect("brock inventory");
    stores
        .participants
        .set(
            AdventureId(ADVENTURE),
            vec![UserId::from(ASH_USER), UserId::from(BROCK_USER)],
        )
        .expect("participants");

    for encounter in encounters {
        stores.encounters.insert(encounter).expect("insert encounter");
    }
    stores
}

pub fn coordinator(
    stores: &MemoryStores,
    rng: impl RandomSource + 'static,
) -> ResolutionCoordinator {
    ResolutionCoordinator::builder()
        .memory_stores(stores)
        .items(Arc::new(ItemOracleImpl::from_items(catalog())))
        .rng(Arc::new(rng))
        .build()
        .expect("coordinator should build")
}

pub fn ash() -> UserId {
    UserId::from(ASH_USER)
}

pub fn brock() -> UserId {
    UserId::from(BROCK_USER)
}
