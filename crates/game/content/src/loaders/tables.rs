//! Balance tables loader.

use std::path::Path;

use crate::balance::BalanceTables;
use crate::loaders::{LoadResult, read_file};

/// Loader for balance curves from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load tables from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<BalanceTables> {
        let tables: BalanceTables = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;

        if tables.enemy.enemies_per_stage == 0 {
            anyhow::bail!("enemy.enemies_per_stage must be at least 1");
        }
        Ok(tables)
    }
}
