//! Runtime configuration read from the process environment.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use encounter_core::{EncounterConfig, RandomSource, SeededRandom, ThreadRandom};

/// Runtime configuration shared by the coordinator and its host binary.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub encounter: EncounterConfig,
    /// TOML file overriding the bundled encounter rules.
    pub config_path: Option<PathBuf>,
    /// RON item catalog overriding the bundled one.
    pub items_path: Option<PathBuf>,
    /// Fixed seed for reproducible sessions; entropy when unset.
    pub rng_seed: Option<u64>,
    /// Compare-and-swap attempts before a capture claim gives up.
    pub capture_retries: u32,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            encounter: EncounterConfig::default(),
            config_path: None,
            items_path: None,
            rng_seed: None,
            capture_retries: 3,
            event_buffer_size: 100,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ENCOUNTER_CONFIG_PATH` - Encounter rules TOML file
    /// - `ENCOUNTER_ITEMS_PATH` - Item catalog RON file
    /// - `ENCOUNTER_RNG_SEED` - Seed for reproducible rolls
    /// - `ENCOUNTER_CAPTURE_RETRIES` - Capture claim attempts (default: 3)
    /// - `ENCOUNTER_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    ///
    /// The encounter rules themselves are not read here; load them with
    /// `encounter_content::ContentFactory` and assign `encounter`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("ENCOUNTER_CONFIG_PATH") {
            config.config_path = Some(path);
        }
        if let Some(path) = read_env::<PathBuf>("ENCOUNTER_ITEMS_PATH") {
            config.items_path = Some(path);
        }
        config.rng_seed = read_env::<u64>("ENCOUNTER_RNG_SEED");
        if let Some(retries) = read_env::<u32>("ENCOUNTER_CAPTURE_RETRIES") {
            config.capture_retries = retries.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ENCOUNTER_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }

    pub fn with_encounter(mut self, encounter: EncounterConfig) -> Self {
        self.encounter = encounter;
        self
    }

    /// Random source matching `rng_seed`.
    pub fn random_source(&self) -> Arc<dyn RandomSource> {
        match self.rng_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
