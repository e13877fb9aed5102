//! One scripted resolution session over in-memory stores.

use std::sync::Arc;

use anyhow::{Context, Result};
use encounter_content::{ConfigLoader, ContentFactory, Fixtures, ItemLoader};
use encounter_core::{
    AdventureId, AreaParams, CatalogItem, Encounter, EncounterGenerator, EncounterId,
    ParticipantRewards, RandomSource, RewardCalculator, UserId,
};
use encounter_runtime::{
    BattleResolution, CaptureOutcome, CaptureRequest, ItemOracleImpl, MemoryStores,
    ResolutionCoordinator, RuntimeConfig,
};
use serde::Serialize;

/// Battle encounter resolved by the session.
const BATTLE: EncounterId = EncounterId(2);
/// Wild encounter captured from by the session.
const WILD: EncounterId = EncounterId(1);
const ADVENTURE: AdventureId = AdventureId(1);
/// Words written over the adventure, for completion rewards.
const WORD_COUNT: u64 = 2_500;

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub generated: Encounter,
    pub battle: Step<BattleResolution>,
    pub capture: Step<CaptureOutcome>,
    pub completion: Vec<(UserId, ParticipantRewards)>,
}

/// Result of one step; failures are reported, not fatal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step<T> {
    Done(T),
    Failed { error: String, retryable: bool },
}

impl<T> From<encounter_runtime::Result<T>> for Step<T> {
    fn from(result: encounter_runtime::Result<T>) -> Self {
        match result {
            Ok(value) => Step::Done(value),
            Err(err) => {
                tracing::warn!("Step failed: {}", err);
                Step::Failed {
                    retryable: err.is_retryable(),
                    error: err.to_string(),
                }
            }
        }
    }
}

pub struct Session {
    config: RuntimeConfig,
    items: Vec<CatalogItem>,
    fixtures: Fixtures,
    stores: MemoryStores,
    coordinator: ResolutionCoordinator,
    rng: Arc<dyn RandomSource>,
}

impl Session {
    /// Loads content, honouring `ENCOUNTER_CONFIG_PATH` and
    /// `ENCOUNTER_ITEMS_PATH` over the bundled files.
    pub fn load(mut config: RuntimeConfig) -> Result<Self> {
        let factory = ContentFactory::bundled();

        config.encounter = match &config.config_path {
            Some(path) => ConfigLoader::load(path)
                .with_context(|| format!("loading encounter rules from {}", path.display()))?,
            None => factory.load_config().context("loading bundled encounter rules")?,
        };
        let items = match &config.items_path {
            Some(path) => ItemLoader::load(path)
                .with_context(|| format!("loading item catalog from {}", path.display()))?,
            None => factory.load_items().context("loading bundled item catalog")?,
        };
        let fixtures = factory.load_fixtures().context("loading bundled fixtures")?;
        tracing::info!(
            "Loaded {} items, {} accounts, {} encounters",
            items.len(),
            fixtures.accounts.len(),
            fixtures.encounters.len()
        );

        let stores = MemoryStores::from_fixtures(&fixtures).context("seeding stores")?;
        let rng = config.random_source();
        let coordinator = ResolutionCoordinator::builder()
            .config(config.clone())
            .memory_stores(&stores)
            .items(Arc::new(ItemOracleImpl::from_items(items.clone())))
            .rng(rng.clone())
            .build()
            .context("building resolution coordinator")?;

        Ok(Self {
            config,
            items,
            fixtures,
            stores,
            coordinator,
            rng,
        })
    }

    pub async fn run(self) -> Result<SessionReport> {
        let generated = self.generate()?;

        let requester = self
            .fixtures
            .accounts
            .first()
            .map(|account| account.user.clone())
            .context("fixtures define no accounts")?;
        let trainer = self
            .fixtures
            .account(&requester)
            .and_then(|account| account.trainers.first())
            .map(|trainer| trainer.name.clone())
            .context("first account has no trainers")?;

        let battle = self.coordinator.resolve_battle(BATTLE, &requester).await.into();

        let request = CaptureRequest::new(WILD, requester, trainer, "ultraball").boost("Pokepuff");
        let capture = self.coordinator.attempt_capture(request).await.into();

        let completion = self.completion_rewards()?;

        Ok(SessionReport {
            generated,
            battle,
            capture,
            completion,
        })
    }

    /// Generates one encounter for the adventure and stores it.
    fn generate(&self) -> Result<Encounter> {
        let generator = EncounterGenerator::new(
            self.config.encounter.generation.clone(),
            self.fixtures.species_pool(),
        );
        let payload = generator
            .generate(&AreaParams::default(), &self.items, self.rng.as_ref())
            .context("generating encounter")?;
        tracing::info!("Generated a {} encounter", payload.kind());

        let next_id = self
            .fixtures
            .encounters
            .iter()
            .map(|encounter| encounter.id.0)
            .max()
            .unwrap_or(0)
            + 1;
        let encounter = Encounter::new(EncounterId(next_id), ADVENTURE, payload.into_payload());
        self.stores
            .encounters
            .insert(encounter.clone())
            .context("storing generated encounter")?;
        Ok(encounter)
    }

    fn completion_rewards(&self) -> Result<Vec<(UserId, ParticipantRewards)>> {
        let calculator = RewardCalculator::from_config(&self.config.encounter);
        let participants = self
            .fixtures
            .adventures
            .iter()
            .find(|adventure| adventure.id == ADVENTURE)
            .map(|adventure| adventure.participants.clone())
            .unwrap_or_default();

        participants
            .into_iter()
            .map(|user| {
                let rewards = calculator
                    .participant_rewards(WORD_COUNT, &self.items, self.rng.as_ref())
                    .context("computing completion rewards")?;
                Ok((user, rewards))
            })
            .collect()
    }
}
