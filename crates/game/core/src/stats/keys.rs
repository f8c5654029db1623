//! Stat identifiers.

/// Every independently tracked player stat.
///
/// Each key owns its own five-layer pipeline, so invalidating one stat never
/// forces recomputation of another. Names serialize in camelCase to match the
/// content files (`critChance`, `poisonMaxStacks`, ...).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum StatKey {
    /// Damage dealt by each strike before transforms.
    Damage,
    /// Attacks per second while holding.
    AttackSpeed,
    /// Probability in `[0, 1]` that a strike becomes a critical hit.
    CritChance,
    /// Critical hit damage multiplier.
    CritMultiplier,
    /// Extra strikes per attack.
    MultiStrike,
    /// Final multiplier applied to every strike.
    DamageMultiplier,
    /// Poison damage per stack per tick.
    Poison,
    /// Poison stack lifetime in ticks.
    PoisonDuration,
    /// Maximum simultaneous poison stacks.
    PoisonMaxStacks,
    /// Probability that a poison tick crits.
    PoisonCritChance,
    /// Probability that an attack executes a non-boss enemy.
    ExecuteChance,
    /// Upper bound applied to execute chance.
    ExecuteCap,
    /// Positive when excess damage carries into the next enemy.
    Overkill,
    /// Gold reward multiplier.
    GoldMultiplier,
    /// Experience reward multiplier.
    XpMultiplier,
    /// Shifts upgrade offers toward rarer cards.
    LuckyChance,
    /// Probability that a regular enemy is a chest.
    ChestChance,
    /// Probability that a defeated boss drops a chest.
    BossChestChance,
    /// Seconds allowed to defeat a boss.
    BossTime,
    /// Raises enemy health and gold rewards together.
    Greed,
    /// Attack speed gained per tap-frenzy stack.
    TapFrenzyBonus,
    /// Tap-frenzy stack lifetime in seconds.
    TapFrenzyDuration,
    /// Maximum tap-frenzy stacks.
    TapFrenzyMaxStacks,
    /// Automatic attacks per second.
    AutoclickerSpeed,
}

impl StatKey {
    /// Dense index used to address per-stat storage.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn parses_camel_case_names() {
        assert_eq!(StatKey::from_str("critChance").unwrap(), StatKey::CritChance);
        assert_eq!(StatKey::from_str("POISONMAXSTACKS").unwrap(), StatKey::PoisonMaxStacks);
        assert!(StatKey::from_str("mana").is_err());
        assert_eq!(StatKey::MultiStrike.to_string(), "multiStrike");
    }

    #[test]
    fn indexes_are_dense() {
        for (expected, key) in StatKey::iter().enumerate() {
            assert_eq!(key.index(), expected);
        }
        assert_eq!(StatKey::iter().count(), StatKey::COUNT);
    }
}
