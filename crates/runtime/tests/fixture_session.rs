//! Resolution against stores seeded from content files.

use std::sync::Arc;

use encounter_content::ContentFactory;
use encounter_core::{EncounterId, SequenceRandom, UserId};
use encounter_runtime::{
    CaptureOutcome, CaptureRequest, EncounterRepository, InventoryCategory, InventoryRepository,
    ItemOracleImpl, MemoryStores, ResolutionCoordinator, RuntimeConfig, TrainerId,
};

fn session(factory: &ContentFactory) -> (MemoryStores, ResolutionCoordinator) {
    let config = factory.load_config().expect("encounter rules");
    let items = factory.load_items().expect("item catalog");
    let fixtures = factory.load_fixtures().expect("fixtures");

    let stores = MemoryStores::from_fixtures(&fixtures).expect("seed stores");
    let coordinator = ResolutionCoordinator::builder()
        .config(RuntimeConfig::default().with_encounter(config))
        .memory_stores(&stores)
        .items(Arc::new(ItemOracleImpl::from_items(items)))
        .rng(Arc::new(SequenceRandom::constant(0.0)))
        .build()
        .expect("coordinator");
    (stores, coordinator)
}

#[tokio::test]
async fn bundled_content_resolves_a_full_session() {
    let (stores, coordinator) = session(&ContentFactory::bundled());
    let ash = UserId::from("100200300");

    let battle = coordinator
        .resolve_battle(EncounterId(2), &ash)
        .await
        .expect("battle resolves");
    assert_eq!(battle.rewards.coins, 750);
    assert_eq!(battle.recipients.len(), 2);

    let capture = coordinator
        .attempt_capture(
            CaptureRequest::new(EncounterId(1), ash.clone(), "ASH", "ultra ball").target(3),
        )
        .await
        .expect("capture attempt");
    let (report, creature) = match capture {
        CaptureOutcome::Captured { report, creature } => (report, creature),
        other => panic!("a zero draw always captures, got {other:?}"),
    };
    assert_eq!(report.target.species.primary_species(), "Oddish");
    assert_eq!(creature.owner, TrainerId(11));

    let inventory = stores.inventory.inventory(TrainerId(11)).await.expect("inventory");
    assert_eq!(inventory.quantity(InventoryCategory::Balls, "Ultra Ball"), 1);

    let wild = stores
        .encounters
        .get(EncounterId(1))
        .await
        .expect("get")
        .expect("encounter exists");
    assert!(!wild.resolved, "captures never resolve a wild encounter");
}

#[tokio::test]
async fn data_directory_without_rules_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bundled = ContentFactory::bundled();
    for file in [ContentFactory::ITEMS_FILE, ContentFactory::FIXTURES_FILE] {
        std::fs::copy(bundled.data_dir().join(file), dir.path().join(file)).expect("copy");
    }

    let (stores, coordinator) = session(&ContentFactory::new(dir.path()));
    let brock = UserId::from("400500600");

    let outcome = coordinator
        .attempt_capture(
            CaptureRequest::new(EncounterId(3), brock, "brock", "Poke Ball")
                .boost("Oran Berry")
                .mid_battle(true),
        )
        .await
        .expect("mid-battle capture");
    let report = outcome.report().expect("report");
    // 0.5 + (1 - 0.30) * 0.5; berries are spent but do not boost
    assert_eq!(report.chance_percent, 85);
    assert_eq!(report.spent.boost_count, 0);

    let inventory = stores.inventory.inventory(TrainerId(21)).await.expect("inventory");
    assert_eq!(inventory.quantity(InventoryCategory::Berries, "Oran Berry"), 1);
    assert_eq!(inventory.quantity(InventoryCategory::Balls, "Poke Ball"), 9);
}
