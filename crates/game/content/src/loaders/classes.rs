//! Class bonus table loader.

use std::path::Path;

use game_core::{ClassTable, PlayerClass, StatModifier};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One class and its bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassEntry {
    pub class: PlayerClass,
    #[serde(default)]
    pub bonuses: Vec<StatModifier>,
}

/// Class table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassTableFile {
    pub classes: Vec<ClassEntry>,
}

/// Loader for the class table from RON files.
pub struct ClassLoader;

impl ClassLoader {
    pub fn load(path: &Path) -> LoadResult<ClassTable> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load classes from {}: {}", path.display(), e))
    }

    /// Parse a class table from RON text. Classes missing from the file get
    /// no bonuses; a class listed twice keeps its last entry.
    pub fn parse(content: &str) -> LoadResult<ClassTable> {
        let file: ClassTableFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse class table RON: {}", e))?;

        Ok(ClassTable {
            classes: file
                .classes
                .into_iter()
                .map(|entry| (entry.class, entry.bonuses))
                .collect(),
        })
    }
}
