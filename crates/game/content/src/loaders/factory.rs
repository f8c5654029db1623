//! Content factory for building the game's data tables from files.

use std::path::{Path, PathBuf};

use game_core::{ClassTable, GameConfig, UpgradeCatalog};

use crate::balance::BalanceTables;
use crate::loaders::{ClassLoader, ConfigLoader, LoadResult, TablesLoader, UpgradeLoader};

const EMBEDDED_CONFIG: &str = include_str!("../../data/config.toml");
const EMBEDDED_TABLES: &str = include_str!("../../data/balance.toml");
const EMBEDDED_UPGRADES: &str = include_str!("../../data/upgrades.ron");
const EMBEDDED_CLASSES: &str = include_str!("../../data/classes.ron");

/// Everything a session needs from content.
#[derive(Clone, Debug)]
pub struct GameContent {
    pub config: GameConfig,
    pub tables: BalanceTables,
    pub upgrades: UpgradeCatalog,
    pub classes: ClassTable,
}

impl GameContent {
    /// Content compiled into the binary.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            config: ConfigLoader::parse(EMBEDDED_CONFIG)?,
            tables: TablesLoader::parse(EMBEDDED_TABLES)?,
            upgrades: UpgradeLoader::parse(EMBEDDED_UPGRADES)?,
            classes: ClassLoader::parse(EMBEDDED_CLASSES)?,
        })
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── balance.toml
/// ├── upgrades.ron
/// └── classes.ron
/// ```
///
/// Files missing from the directory fall back to the embedded defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        self.load_or_embedded("config.toml", ConfigLoader::load, || {
            ConfigLoader::parse(EMBEDDED_CONFIG)
        })
    }

    /// Load balance curves from `balance.toml`.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        self.load_or_embedded("balance.toml", TablesLoader::load, || {
            TablesLoader::parse(EMBEDDED_TABLES)
        })
    }

    /// Load the upgrade catalog from `upgrades.ron`.
    pub fn load_upgrades(&self) -> LoadResult<UpgradeCatalog> {
        self.load_or_embedded("upgrades.ron", UpgradeLoader::load, || {
            UpgradeLoader::parse(EMBEDDED_UPGRADES)
        })
    }

    /// Load class bonuses from `classes.ron`.
    pub fn load_classes(&self) -> LoadResult<ClassTable> {
        self.load_or_embedded("classes.ron", ClassLoader::load, || {
            ClassLoader::parse(EMBEDDED_CLASSES)
        })
    }

    /// Load every content file.
    pub fn load_all(&self) -> LoadResult<GameContent> {
        Ok(GameContent {
            config: self.load_config()?,
            tables: self.load_tables()?,
            upgrades: self.load_upgrades()?,
            classes: self.load_classes()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_or_embedded<T>(
        &self,
        file_name: &str,
        load: impl FnOnce(&Path) -> LoadResult<T>,
        embedded: impl FnOnce() -> LoadResult<T>,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file_name);
        if path.exists() {
            load(&path)
        } else {
            tracing::debug!(
                target: "game_content",
                file = %path.display(),
                "Content file not found; using embedded default"
            );
            embedded()
        }
    }
}
