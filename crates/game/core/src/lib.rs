//! Pure encounter resolution rules shared by the runtime and offline tools.
//!
//! `encounter-core` owns the data model (encounters, monster groups, target
//! descriptors), the Probability Roller, the Reward Calculator, the Capture
//! Evaluator, the Encounter Allocator and encounter generation. Nothing here
//! performs I/O: randomness arrives through [`RandomSource`] and the item
//! catalog is passed in by the caller. Persistence and atomic state
//! transitions belong to `encounter-runtime`.
pub mod allocate;
pub mod capture;
pub mod config;
pub mod encounter;
pub mod env;
pub mod error;
pub mod generate;
pub mod outcome;
pub mod reward;
pub mod roll;

pub use allocate::{EncounterAllocator, TargetDescriptor};
pub use capture::{CaptureChance, CaptureEvaluator, CaptureRoll, ResolvedDevice, fold_name};
pub use config::{
    AdventureRewardRates, AllocationRules, BattleRules, CaptureRules, DeviceRate, EncounterConfig,
    GenerationRules, OutcomeProfile, RarityTables, RewardRules, Span,
};
pub use encounter::{
    AdventureId, BattleEncounter, CaptureRecord, Encounter, EncounterId, EncounterKind,
    EncounterPayload, EnemyMonster, EnemyTrainer, GroupError, ItemEncounter, MonsterGroup,
    SpeciesDescriptor, UserId, WildEncounter, record_group_capture,
};
pub use env::{CatalogItem, ItemId, RandomSource, SeededRandom, SequenceRandom, ThreadRandom};
pub use error::{ConfigError, EngineError, ErrorSeverity};
pub use generate::{
    AreaParams, EncounterGenerator, GeneratedEncounter, GeneratedKind, GenerationError,
    SpeciesLimits, SpeciesPool, SpeciesSource,
};
pub use outcome::{BattleOutcome, ItemRarity};
pub use reward::{ItemPick, ParticipantRewards, RewardBundle, RewardCalculator, RewardError, RewardItem};
pub use roll::{WeightEntry, WeightTable};
