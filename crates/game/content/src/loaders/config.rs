//! Encounter configuration loader.

use std::path::Path;

use encounter_core::EncounterConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`EncounterConfig`] from TOML files.
///
/// Sections and fields missing from the file keep their defaults, so a data
/// file only needs to list what it changes. The merged result is validated
/// before it is returned.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid encounter config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterConfig> {
        let config: EncounterConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use encounter_core::BattleOutcome;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), EncounterConfig::default());
    }

    #[test]
    fn partial_sections_override_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [capture]
            boost_bonus = 0.1

            [allocation]
            level_max = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.capture.boost_bonus, 0.1);
        assert_eq!(config.capture.max_chance, 0.95);
        assert_eq!(config.allocation.level_min, 5);
        assert_eq!(config.allocation.level_max, 30);
        assert_eq!(config.battle.default_outcome, BattleOutcome::Draw);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let err = ConfigLoader::parse(
            r#"
            [[capture.devices]]
            name = "Cracked Ball"
            base_rate = 0.1
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cracked Ball"));
    }
}
