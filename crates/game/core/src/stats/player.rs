//! Flattened view of every derived stat, consumed by combat systems.

use super::keys::StatKey;

/// Snapshot of every player stat at one point in time.
///
/// Every field is always present, so systems never need to guard against
/// missing keys. `execute_cap` is the only optional stat: `None` means
/// "uncapped" and is distinct from `Some(0.0)`, which disables execute.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PlayerStats {
    pub damage: f64,
    pub attack_speed: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub multi_strike: f64,
    pub damage_multiplier: f64,
    pub poison: f64,
    pub poison_duration: f64,
    pub poison_max_stacks: f64,
    pub poison_crit_chance: f64,
    pub execute_chance: f64,
    pub execute_cap: Option<f64>,
    pub overkill: f64,
    pub gold_multiplier: f64,
    pub xp_multiplier: f64,
    pub lucky_chance: f64,
    pub chest_chance: f64,
    pub boss_chest_chance: f64,
    pub boss_time: f64,
    pub greed: f64,
    pub tap_frenzy_bonus: f64,
    pub tap_frenzy_duration: f64,
    pub tap_frenzy_max_stacks: f64,
    pub autoclicker_speed: f64,
}

impl PlayerStats {
    /// Upper bound on strikes in one attack.
    pub const MAX_STRIKES: usize = u16::MAX as usize;

    /// Builds a snapshot by reading each stat through `read`.
    ///
    /// `execute_cap` is filled separately by the caller because its absence is meaningful.
    pub fn from_fn(mut read: impl FnMut(StatKey) -> f64) -> Self {
        use StatKey::*;
        Self {
            damage: read(Damage),
            attack_speed: read(AttackSpeed),
            crit_chance: read(CritChance),
            crit_multiplier: read(CritMultiplier),
            multi_strike: read(MultiStrike),
            damage_multiplier: read(DamageMultiplier),
            poison: read(Poison),
            poison_duration: read(PoisonDuration),
            poison_max_stacks: read(PoisonMaxStacks),
            poison_crit_chance: read(PoisonCritChance),
            execute_chance: read(ExecuteChance),
            execute_cap: None,
            overkill: read(Overkill),
            gold_multiplier: read(GoldMultiplier),
            xp_multiplier: read(XpMultiplier),
            lucky_chance: read(LuckyChance),
            chest_chance: read(ChestChance),
            boss_chest_chance: read(BossChestChance),
            boss_time: read(BossTime),
            greed: read(Greed),
            tap_frenzy_bonus: read(TapFrenzyBonus),
            tap_frenzy_duration: read(TapFrenzyDuration),
            tap_frenzy_max_stacks: read(TapFrenzyMaxStacks),
            autoclicker_speed: read(AutoclickerSpeed),
        }
    }

    /// Reads one stat by key. An absent execute cap reads as zero.
    pub fn get(&self, key: StatKey) -> f64 {
        use StatKey::*;
        match key {
            Damage => self.damage,
            AttackSpeed => self.attack_speed,
            CritChance => self.crit_chance,
            CritMultiplier => self.crit_multiplier,
            MultiStrike => self.multi_strike,
            DamageMultiplier => self.damage_multiplier,
            Poison => self.poison,
            PoisonDuration => self.poison_duration,
            PoisonMaxStacks => self.poison_max_stacks,
            PoisonCritChance => self.poison_crit_chance,
            ExecuteChance => self.execute_chance,
            ExecuteCap => self.execute_cap.unwrap_or(0.0),
            Overkill => self.overkill,
            GoldMultiplier => self.gold_multiplier,
            XpMultiplier => self.xp_multiplier,
            LuckyChance => self.lucky_chance,
            ChestChance => self.chest_chance,
            BossChestChance => self.boss_chest_chance,
            BossTime => self.boss_time,
            Greed => self.greed,
            TapFrenzyBonus => self.tap_frenzy_bonus,
            TapFrenzyDuration => self.tap_frenzy_duration,
            TapFrenzyMaxStacks => self.tap_frenzy_max_stacks,
            AutoclickerSpeed => self.autoclicker_speed,
        }
    }

    /// Number of strikes per attack: one plus whole extra strikes, capped at
    /// [`Self::MAX_STRIKES`].
    pub fn strike_count(&self) -> usize {
        let extra = self.multi_strike.max(0.0).floor();
        if extra >= Self::MAX_STRIKES as f64 {
            tracing::warn!(
                target: "game_core::stats",
                multi_strike = self.multi_strike,
                max = Self::MAX_STRIKES,
                "Clamping strike count"
            );
            return Self::MAX_STRIKES;
        }
        1usize.saturating_add(extra as usize).min(Self::MAX_STRIKES)
    }

    pub fn overkill_enabled(&self) -> bool {
        self.overkill > 0.0
    }
}
