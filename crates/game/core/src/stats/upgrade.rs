//! Upgrade cards and the additive modifiers they carry.

use std::collections::HashMap;

use super::keys::StatKey;
use crate::error::UpgradeError;

/// An additive change to one stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKey,
    pub value: f64,
}

impl StatModifier {
    pub const fn new(stat: StatKey, value: f64) -> Self {
        Self { stat, value }
    }
}

/// Card rarity, which drives how often an upgrade is offered.
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
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Base offer weight before luck is applied.
    pub const fn base_weight(self) -> f64 {
        match self {
            Self::Common => 100.0,
            Self::Uncommon => 50.0,
            Self::Rare => 20.0,
            Self::Epic => 6.0,
            Self::Legendary => 1.0,
        }
    }

    /// Offer weight with `luck` shifting mass toward rarer tiers.
    ///
    /// Each tier above common gains `luck × tier` relative weight; common is unaffected.
    pub fn weight(self, luck: f64) -> f64 {
        let tier = self as u8 as f64;
        self.base_weight() * (1.0 + luck.max(0.0) * tier)
    }
}

/// A selectable upgrade card.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upgrade {
    pub id: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    pub modifiers: Vec<StatModifier>,
}

impl Upgrade {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        rarity: Rarity,
        modifiers: Vec<StatModifier>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            rarity,
            modifiers,
        }
    }
}

/// Lookup table of every upgrade that can be offered.
#[derive(Clone, Debug, Default)]
pub struct UpgradeCatalog {
    upgrades: Vec<Upgrade>,
    by_id: HashMap<String, usize>,
}

impl UpgradeCatalog {
    /// Builds a catalog. Later duplicates of an id replace earlier ones in lookups.
    pub fn new(upgrades: Vec<Upgrade>) -> Self {
        let by_id = upgrades
            .iter()
            .enumerate()
            .map(|(i, u)| (u.id.clone(), i))
            .collect();
        Self { upgrades, by_id }
    }

    pub fn get(&self, id: &str) -> Result<&Upgrade, UpgradeError> {
        self.by_id
            .get(id)
            .map(|&i| &self.upgrades[i])
            .ok_or_else(|| UpgradeError::UnknownUpgrade(id.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }

    /// Collects the modifiers of every acquired id, in acquisition order.
    ///
    /// Duplicate ids contribute once per occurrence.
    pub fn modifiers_for(&self, acquired: &[String]) -> Result<Vec<StatModifier>, UpgradeError> {
        let mut modifiers = Vec::new();
        for id in acquired {
            modifiers.extend_from_slice(&self.get(id)?.modifiers);
        }
        Ok(modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UpgradeCatalog {
        UpgradeCatalog::new(vec![
            Upgrade::new(
                "sharpen",
                "Sharpen",
                Rarity::Common,
                vec![StatModifier::new(StatKey::Damage, 2.0)],
            ),
            Upgrade::new(
                "venom",
                "Venom",
                Rarity::Rare,
                vec![
                    StatModifier::new(StatKey::Poison, 1.0),
                    StatModifier::new(StatKey::PoisonDuration, 1.0),
                ],
            ),
        ])
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert_eq!(
            catalog().get("nope").unwrap_err(),
            UpgradeError::UnknownUpgrade("nope".into())
        );
    }

    #[test]
    fn duplicate_acquisitions_stack() {
        let acquired = vec!["sharpen".to_string(), "venom".into(), "sharpen".into()];
        let mods = catalog().modifiers_for(&acquired).unwrap();
        let damage: f64 = mods
            .iter()
            .filter(|m| m.stat == StatKey::Damage)
            .map(|m| m.value)
            .sum();
        assert_eq!(damage, 4.0);
        assert_eq!(mods.len(), 4);
    }

    #[test]
    fn luck_favours_rare_tiers() {
        assert_eq!(Rarity::Common.weight(2.0), Rarity::Common.base_weight());
        assert!(Rarity::Legendary.weight(1.0) > Rarity::Legendary.base_weight());
    }
}
