//! Content factory for loading every data file from one directory.

use std::path::{Path, PathBuf};

use encounter_core::{CatalogItem, EncounterConfig};

use crate::loaders::{ConfigLoader, FixtureLoader, Fixtures, ItemLoader, LoadResult};

/// Content factory that loads encounter content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── encounter.toml
/// ├── items.ron
/// └── fixtures.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "encounter.toml";
    pub const ITEMS_FILE: &'static str = "items.ron";
    pub const FIXTURES_FILE: &'static str = "fixtures.ron";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data files shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load encounter rules from `encounter.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<EncounterConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(EncounterConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<CatalogItem>> {
        ItemLoader::load(&self.data_dir.join(Self::ITEMS_FILE))
    }

    /// Load seed data from `fixtures.ron`.
    pub fn load_fixtures(&self) -> LoadResult<Fixtures> {
        FixtureLoader::load(&self.data_dir.join(Self::FIXTURES_FILE))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), EncounterConfig::default());
        assert!(factory.load_items().is_err());
    }
}
