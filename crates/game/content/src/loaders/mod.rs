//! Content loaders for reading game data from files.
//!
//! Each loader accepts either a path or the file contents, so the embedded
//! defaults and on-disk overrides go through the same parser.

pub mod classes;
pub mod config;
pub mod factory;
pub mod tables;
pub mod upgrades;

pub use classes::ClassLoader;
pub use config::ConfigLoader;
pub use factory::{ContentFactory, GameContent};
pub use tables::TablesLoader;
pub use upgrades::UpgradeLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
