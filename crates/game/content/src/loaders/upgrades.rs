//! Upgrade catalog loader.

use std::collections::HashSet;
use std::path::Path;

use game_core::{Upgrade, UpgradeCatalog};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Upgrade catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeCatalogFile {
    pub upgrades: Vec<Upgrade>,
}

/// Loader for the upgrade catalog from RON files.
pub struct UpgradeLoader;

impl UpgradeLoader {
    /// Load the upgrade catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<UpgradeCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load upgrades from {}: {}", path.display(), e))
    }

    /// Parse an upgrade catalog from RON text.
    ///
    /// Rejects duplicate ids, since acquired-id lists could not tell them apart.
    pub fn parse(content: &str) -> LoadResult<UpgradeCatalog> {
        let file: UpgradeCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse upgrade catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for upgrade in &file.upgrades {
            if !seen.insert(upgrade.id.as_str()) {
                anyhow::bail!("Duplicate upgrade id `{}`", upgrade.id);
            }
        }

        Ok(UpgradeCatalog::new(file.upgrades))
    }
}
