//! Game configuration loader.

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{GameConfig, StatKey};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// On-disk shape of [`GameConfig`]. Stat names are plain TOML keys and are
/// resolved against [`StatKey`] after parsing.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    base_stats: BTreeMap<String, f64>,
    base_execute_cap: Option<f64>,
    max_frame_delta_ms: f64,
    poison_tick_ms: f64,
    frenzy_decay_ms: f64,
    offer_count: usize,
    default_poison_duration: u32,
    default_poison_max_stacks: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            base_stats: config
                .base_stats
                .iter()
                .map(|(key, value)| (key.to_string(), *value))
                .collect(),
            base_execute_cap: config.base_execute_cap,
            max_frame_delta_ms: config.max_frame_delta_ms,
            poison_tick_ms: config.poison_tick_ms,
            frenzy_decay_ms: config.frenzy_decay_ms,
            offer_count: config.offer_count,
            default_poison_duration: config.default_poison_duration,
            default_poison_max_stacks: config.default_poison_max_stacks,
        }
    }
}

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e))
    }

    /// Parse config from TOML text. Omitted fields keep their defaults; a
    /// `[base_stats]` table replaces the default base stats entirely.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(file.max_frame_delta_ms >= 0.0) {
            anyhow::bail!(
                "max_frame_delta_ms must be a non-negative number, got {}",
                file.max_frame_delta_ms
            );
        }

        let mut base_stats = BTreeMap::new();
        for (name, value) in file.base_stats {
            let key: StatKey = name
                .parse()
                .map_err(|e| anyhow::anyhow!("Unknown stat `{}` in base_stats: {}", name, e))?;
            base_stats.insert(key, value);
        }

        Ok(GameConfig {
            base_stats,
            base_execute_cap: file.base_execute_cap,
            max_frame_delta_ms: file.max_frame_delta_ms,
            poison_tick_ms: file.poison_tick_ms,
            frenzy_decay_ms: file.frenzy_decay_ms,
            offer_count: file.offer_count,
            default_poison_duration: file.default_poison_duration,
            default_poison_max_stacks: file.default_poison_max_stacks,
        })
    }
}
