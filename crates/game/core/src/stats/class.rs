//! Player classes and the stat bonuses that fill the class layer.

use std::collections::BTreeMap;

use super::keys::StatKey;
use super::upgrade::StatModifier;

/// Starting archetype chosen at the beginning of a run.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlayerClass {
    /// No class bonuses.
    #[default]
    None,
    /// Heavy hitter.
    Warrior,
    /// Crits and executes.
    Rogue,
    /// Poison specialist.
    Alchemist,
}

impl PlayerClass {
    /// Built-in bonuses, used when no class table is loaded from content.
    pub fn default_bonuses(self) -> Vec<StatModifier> {
        use StatKey::*;
        let pairs: &[(StatKey, f64)] = match self {
            Self::None => &[],
            Self::Warrior => &[(Damage, 2.0), (DamageMultiplier, 0.1)],
            Self::Rogue => &[(CritChance, 0.1), (ExecuteChance, 0.02), (AttackSpeed, 0.2)],
            Self::Alchemist => &[(Poison, 1.0), (PoisonMaxStacks, 2.0), (PoisonDuration, 2.0)],
        };
        pairs
            .iter()
            .map(|&(stat, value)| StatModifier::new(stat, value))
            .collect()
    }
}

/// Class bonus table, keyed by class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTable {
    pub classes: BTreeMap<PlayerClass, Vec<StatModifier>>,
}

impl ClassTable {
    pub fn bonuses(&self, class: PlayerClass) -> &[StatModifier] {
        self.classes.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        use strum::IntoEnumIterator;
        Self {
            classes: PlayerClass::iter()
                .map(|class| (class, class.default_bonuses()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_every_class() {
        let table = ClassTable::default();
        assert!(table.bonuses(PlayerClass::None).is_empty());
        assert!(
            table
                .bonuses(PlayerClass::Alchemist)
                .iter()
                .any(|m| m.stat == StatKey::Poison)
        );
    }
}
