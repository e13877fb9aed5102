mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use common::{ASH, BROCK, ash, brock, coordinator, group, stores};
use encounter_core::{
    BattleEncounter, Encounter, EncounterId, EncounterPayload, EnemyMonster, MonsterGroup,
    SequenceRandom, UserId,
};
use encounter_runtime::{
    CaptureEvent, CaptureOutcome, CaptureRequest, CreatedCreature, CreatureFactory, CreatureSpec,
    EncounterRepository, Event, InMemoryEncounterRepo, InventoryCategory, InventoryRepository,
    ItemOracleImpl, MemoryStores, PartialFailure, RepositoryError, ResolutionCoordinator,
    ResolutionError, RuntimeConfig, Topic, TrainerId, UpdateOutcome,
};

const WILD: u64 = 1;

fn wild(groups: Vec<MonsterGroup>) -> Encounter {
    Encounter::wild(WILD, common::ADVENTURE, groups)
}

fn ash_request(device: &str) -> CaptureRequest {
    CaptureRequest::new(EncounterId(WILD), ash(), "ash", device)
}

async fn groups(stores: &MemoryStores, id: u64) -> Vec<MonsterGroup> {
    stores
        .encounters
        .get(EncounterId(id))
        .await
        .expect("get")
        .expect("encounter exists")
        .payload
        .capture_groups()
        .expect("capturable")
        .to_vec()
}

async fn held(
    stores: &MemoryStores,
    trainer: TrainerId,
    category: InventoryCategory,
    key: &str,
) -> u32 {
    stores
        .inventory
        .inventory(trainer)
        .await
        .expect("inventory")
        .quantity(category, key)
}

/// Master Ball (base rate 1.0), no boosts, level 5, not mid-battle.
#[tokio::test]
async fn master_ball_is_clamped_to_ninety_five_percent() {
    let stores = stores([wild(vec![group("Eevee", 2)])]);
    // level draws land on 5, the success draw on 0.0
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let outcome = coordinator
        .attempt_capture(ash_request("master ball"))
        .await
        .expect("capture attempt");

    let (report, creature) = match outcome {
        CaptureOutcome::Captured { report, creature } => (report, creature),
        other => panic!("expected a capture, got {other:?}"),
    };
    assert_eq!(report.target.level, 5);
    assert_eq!(report.chance.base_rate, 1.0);
    assert_eq!(report.chance.probability, 0.95);
    assert_eq!(report.chance_percent, 95);
    assert_eq!(report.spent.device, "Master Ball");
    assert_eq!(report.trainer.id, ASH);
    assert_eq!(creature.owner, ASH);
    assert_eq!(creature.level, 5);

    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Master Ball").await, 0);
    let groups = groups(&stores, WILD).await;
    assert_eq!(groups[0].available, 1);
    assert_eq!(groups[0].captured.len(), 1);
    assert_eq!(groups[0].captured[0].requester, ash());
    assert_eq!(stores.creatures.created().expect("created").len(), 1);
}

/// A group of two: the requester's second claim sees the second monster.
#[tokio::test]
async fn prior_claims_shift_the_requesters_target_list() {
    let stores = stores([wild(vec![group("Eevee", 2)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let first = coordinator
        .attempt_capture(ash_request("Poke Ball").target(1))
        .await
        .expect("first attempt");
    let first = first.report().expect("report").target.clone();
    assert_eq!((first.group_index, first.slot, first.display_index), (0, 0, 1));

    let after_first = groups(&stores, WILD).await;
    assert_eq!(after_first[0].available, 1);
    assert_eq!(after_first[0].captured.len(), 1);

    let second = coordinator
        .attempt_capture(ash_request("Poke Ball").target(1))
        .await
        .expect("second attempt");
    assert!(second.is_captured());
    let second = second.report().expect("report").target.clone();
    assert_eq!((second.group_index, second.slot, second.display_index), (0, 1, 1));

    let exhausted = coordinator
        .attempt_capture(ash_request("Poke Ball"))
        .await
        .expect("third attempt");
    assert_eq!(exhausted, CaptureOutcome::NothingToCapture);
    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 3);
}

#[tokio::test]
async fn an_escape_still_costs_the_consumables() {
    let stores = stores([wild(vec![group("Oddish", 1)])]);
    // level draw lands on 15, the success draw fails
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.99));

    let outcome = coordinator
        .attempt_capture(ash_request("pokeball").boosts("pokepuff", 2))
        .await
        .expect("capture attempt");

    let report = match outcome {
        CaptureOutcome::Escaped { report } => report,
        other => panic!("expected an escape, got {other:?}"),
    };
    // 0.5 + 2 * 0.25 - (15 - 10) * 0.02
    assert!((report.chance.probability - 0.9).abs() < 1e-9);
    assert_eq!(report.chance_percent, 90);
    assert_eq!(report.spent.boost_count, 2);
    assert_eq!(report.spent.items, vec![("Pokepuff".to_string(), 2)]);

    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 4);
    assert_eq!(held(&stores, ASH, InventoryCategory::Items, "Pokepuff").await, 1);
    let groups = groups(&stores, WILD).await;
    assert_eq!(groups[0].available, 1);
    assert!(groups[0].captured.is_empty());
    assert!(stores.creatures.created().expect("created").is_empty());
}

#[tokio::test]
async fn only_the_boost_item_raises_the_chance() {
    let stores = stores([wild(vec![group("Oddish", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let outcome = coordinator
        .attempt_capture(ash_request("Poke Ball").boost("Pokepuff").boost("oran berry"))
        .await
        .expect("capture attempt");

    let report = outcome.report().expect("report");
    assert_eq!(report.spent.boost_count, 1);
    assert_eq!(
        report.spent.items,
        vec![("Pokepuff".to_string(), 1), ("Oran Berry".to_string(), 1)]
    );
    assert_eq!(report.chance.probability, 0.75);
    assert_eq!(held(&stores, ASH, InventoryCategory::Berries, "Oran Berry").await, 0);
}

#[tokio::test]
async fn missing_consumables_are_rejected_before_any_debit() {
    let stores = stores([wild(vec![group("Eevee", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let err = coordinator
        .attempt_capture(CaptureRequest::new(EncounterId(WILD), brock(), "Brock", "Ultra Ball"))
        .await
        .expect_err("brock holds no ultra balls");
    assert!(matches!(
        err,
        ResolutionError::InsufficientConsumables { ref item, required: 1, available: 0 } if item == "Ultra Ball"
    ));

    let err = coordinator
        .attempt_capture(ash_request("Poke Ball").boosts("Pokepuff", 4))
        .await
        .expect_err("ash holds three pokepuffs");
    assert!(matches!(
        err,
        ResolutionError::InsufficientConsumables { required: 4, available: 3, .. }
    ));

    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 5);
    assert_eq!(held(&stores, ASH, InventoryCategory::Items, "Pokepuff").await, 3);
    assert_eq!(held(&stores, BROCK, InventoryCategory::Balls, "Poke Ball").await, 10);
}

#[tokio::test]
async fn unknown_requesters_and_trainers_are_not_found() {
    let stores = stores([wild(vec![group("Eevee", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let err = coordinator
        .attempt_capture(CaptureRequest::new(EncounterId(WILD), "999", "Gary", "Poke Ball"))
        .await
        .expect_err("no account");
    assert!(matches!(err, ResolutionError::NotFound { .. }));

    let err = coordinator
        .attempt_capture(CaptureRequest::new(EncounterId(WILD), ash(), "Brock", "Poke Ball"))
        .await
        .expect_err("brock is not one of ash's trainers");
    assert!(matches!(err, ResolutionError::NotFound { .. }));

    let err = coordinator
        .attempt_capture(CaptureRequest::new(EncounterId(404), ash(), "Ash", "Poke Ball"))
        .await
        .expect_err("no encounter");
    assert!(matches!(err, ResolutionError::NotFound { .. }));
}

#[tokio::test]
async fn out_of_range_indexes_are_clamped() {
    let stores = stores([wild(vec![group("Eevee", 1), group("Oddish", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let outcome = coordinator
        .attempt_capture(ash_request("Poke Ball").target(9))
        .await
        .expect("capture attempt");
    let target = &outcome.report().expect("report").target;
    assert_eq!(target.clamped_from, Some(9));
    assert_eq!(target.display_index, 2);
    assert_eq!(target.group_index, 1);
    assert_eq!(target.species.primary_species(), "Oddish");
}

fn escalated_battle(id: u64) -> Encounter {
    let wild_group = group("Growlithe", 1).with_agro(82);
    Encounter::battle(
        id,
        common::ADVENTURE,
        BattleEncounter {
            trainers: Vec::new(),
            monsters: vec![EnemyMonster::from_group(0, &wild_group, 12)],
            wild_groups: vec![wild_group],
        },
    )
}

#[tokio::test]
async fn battles_need_the_mid_battle_flag() {
    let stores = stores([escalated_battle(3)]);
    // level 5, remaining health 0.30, success
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));
    let request = CaptureRequest::new(EncounterId(3), ash(), "Ash", "Poke Ball");

    let err = coordinator
        .attempt_capture(request.clone())
        .await
        .expect_err("not flagged mid-battle");
    assert!(matches!(err, ResolutionError::Validation { .. }));

    let outcome = coordinator
        .attempt_capture(request.mid_battle(true))
        .await
        .expect("mid-battle capture");
    let report = outcome.report().expect("report");
    assert_eq!(report.chance.remaining_health, Some(0.30));
    // 0.5 + (1 - 0.30) * 0.5
    assert!((report.chance.probability - 0.85).abs() < 1e-9);
    assert!(outcome.is_captured());
    assert_eq!(groups(&stores, 3).await[0].available, 0);
}

#[tokio::test]
async fn resolved_battles_reject_captures() {
    let stores = stores([escalated_battle(3)]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));
    coordinator
        .resolve_battle(EncounterId(3), &brock())
        .await
        .expect("battle resolves");

    let err = coordinator
        .attempt_capture(
            CaptureRequest::new(EncounterId(3), ash(), "Ash", "Poke Ball").mid_battle(true),
        )
        .await
        .expect_err("already resolved");
    assert!(matches!(err, ResolutionError::AlreadyResolved(EncounterId(3))));
    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 5);
}

/// Two trainers race for the last monster of a group.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_captures_never_double_allocate() {
    let stores = stores([wild(vec![group("Eevee", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let mut tasks = Vec::new();
    for n in 0..8 {
        let coordinator = coordinator.clone();
        let request = if n % 2 == 0 {
            CaptureRequest::new(EncounterId(WILD), ash(), "Ash", "Poke Ball")
        } else {
            CaptureRequest::new(EncounterId(WILD), brock(), "Brock", "Poke Ball")
        };
        tasks.push(tokio::spawn(async move { coordinator.attempt_capture(request).await }));
    }

    let mut captured = 0;
    for task in tasks {
        match task.await.expect("task should not panic") {
            Ok(CaptureOutcome::Captured { .. }) => captured += 1,
            Ok(CaptureOutcome::NothingToCapture) => {}
            Err(ResolutionError::CaptureUnavailable { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    assert_eq!(captured, 1);
    let groups = groups(&stores, WILD).await;
    assert_eq!(groups[0].available, 0);
    assert_eq!(groups[0].captured.len(), 1);
    assert_eq!(stores.creatures.created().expect("created").len(), 1);

    // losers were refunded; only the winner paid
    let ash_balls = held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await;
    let brock_balls = held(&stores, BROCK, InventoryCategory::Balls, "Poke Ball").await;
    assert_eq!(ash_balls + brock_balls, 14);
}

/// Reports a version conflict for the first `remaining` payload writes.
struct ContendedEncounters {
    inner: InMemoryEncounterRepo,
    remaining: AtomicU32,
}

#[async_trait]
impl EncounterRepository for ContendedEncounters {
    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>, RepositoryError> {
        self.inner.get(id).await
    }

    async fn update_payload(
        &self,
        id: EncounterId,
        expected_version: u64,
        payload: EncounterPayload,
    ) -> Result<UpdateOutcome, RepositoryError> {
        let contended = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if contended {
            return Ok(UpdateOutcome::Conflict {
                current_version: expected_version + 1,
            });
        }
        self.inner.update_payload(id, expected_version, payload).await
    }

    async fn mark_resolved(&self, id: EncounterId) -> Result<bool, RepositoryError> {
        self.inner.mark_resolved(id).await
    }
}

fn contended_coordinator(stores: &MemoryStores, conflicts: u32) -> ResolutionCoordinator {
    let encounters = ContendedEncounters {
        inner: InMemoryEncounterRepo::with_encounters([wild(vec![group("Eevee", 1)])]),
        remaining: AtomicU32::new(conflicts),
    };
    ResolutionCoordinator::builder()
        .config(RuntimeConfig {
            capture_retries: 3,
            ..RuntimeConfig::default()
        })
        .memory_stores(stores)
        .encounters(Arc::new(encounters))
        .items(Arc::new(ItemOracleImpl::from_items(common::catalog())))
        .rng(Arc::new(SequenceRandom::constant(0.0)))
        .build()
        .expect("coordinator")
}

#[tokio::test]
async fn version_conflicts_are_retried() {
    let stores = stores(Vec::<Encounter>::new());
    let coordinator = contended_coordinator(&stores, 2);

    let outcome = coordinator
        .attempt_capture(ash_request("Poke Ball"))
        .await
        .expect("third write applies");
    assert!(outcome.is_captured());
    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 4);
}

#[tokio::test]
async fn persistent_conflicts_refund_and_report_unavailable() {
    let stores = stores(Vec::<Encounter>::new());
    let coordinator = contended_coordinator(&stores, 5);

    let err = coordinator
        .attempt_capture(ash_request("Poke Ball").boost("Pokepuff"))
        .await
        .expect_err("every write conflicts");
    assert!(matches!(err, ResolutionError::CaptureUnavailable { .. }));
    assert!(err.is_retryable());
    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 5);
    assert_eq!(held(&stores, ASH, InventoryCategory::Items, "Pokepuff").await, 3);
    assert!(stores.creatures.created().expect("created").is_empty());
}

struct BrokenIncubator;

#[async_trait]
impl CreatureFactory for BrokenIncubator {
    async fn initialize_and_create(
        &self,
        _spec: CreatureSpec,
        _owner: TrainerId,
    ) -> Result<CreatedCreature, RepositoryError> {
        Err(RepositoryError::Unavailable("creature store down".into()))
    }
}

#[tokio::test]
async fn failed_creation_refunds_and_keeps_the_claim() {
    let stores = stores([wild(vec![group("Eevee", 2)])]);
    let coordinator = ResolutionCoordinator::builder()
        .memory_stores(&stores)
        .creatures(Arc::new(BrokenIncubator))
        .items(Arc::new(ItemOracleImpl::from_items(common::catalog())))
        .rng(Arc::new(SequenceRandom::constant(0.0)))
        .build()
        .expect("coordinator");

    let err = coordinator
        .attempt_capture(ash_request("Poke Ball"))
        .await
        .expect_err("creation fails");

    match &err {
        ResolutionError::PartialFailure {
            encounter,
            failure: PartialFailure::OrphanedCapture { group_index, requester },
            ..
        } => {
            assert_eq!(*encounter, EncounterId(WILD));
            assert_eq!(*group_index, 0);
            assert_eq!(*requester, ash());
        }
        other => panic!("expected an orphaned capture, got {other}"),
    }
    assert!(err.is_partial_failure());

    assert_eq!(held(&stores, ASH, InventoryCategory::Balls, "Poke Ball").await, 5);
    let groups = groups(&stores, WILD).await;
    assert_eq!(groups[0].available, 1, "availability never grows back");
    assert_eq!(groups[0].captured.len(), 1);
}

#[tokio::test]
async fn attempts_and_commits_are_published() {
    let stores = stores([wild(vec![group("Eevee", 1)])]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));
    let mut events = coordinator.events().subscribe(Topic::Capture);

    coordinator
        .attempt_capture(ash_request("Poke Ball"))
        .await
        .expect("capture attempt");

    assert_eq!(
        events.recv().await.expect("attempt event"),
        Event::Capture(CaptureEvent::CaptureAttempted {
            encounter: EncounterId(WILD),
            requester: ash(),
            group_index: 0,
            chance_percent: 50,
            success: true,
        })
    );
    assert_eq!(
        events.recv().await.expect("commit event"),
        Event::Capture(CaptureEvent::CaptureCommitted {
            encounter: EncounterId(WILD),
            requester: ash(),
            group_index: 0,
            creature_id: 1,
        })
    );
}

#[tokio::test]
async fn item_encounters_cannot_be_captured() {
    let item = Encounter::new(
        EncounterId(5),
        encounter_core::AdventureId(common::ADVENTURE),
        EncounterPayload::Item(encounter_core::ItemEncounter {
            item: common::catalog().remove(0),
        }),
    );
    let stores = stores([item]);
    let coordinator = coordinator(&stores, SequenceRandom::constant(0.0));

    let err = coordinator
        .attempt_capture(
            CaptureRequest::new(EncounterId(5), UserId::from(common::ASH_USER), "Ash", "Poke Ball")
                .mid_battle(true),
        )
        .await
        .expect_err("items are picked up, not captured");
    assert!(matches!(err, ResolutionError::Validation { .. }));
}
