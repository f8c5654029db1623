use std::collections::BTreeMap;

use crate::combat::systems::PoisonSystem;
use crate::stats::{StatKey, StatPipeline};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Starting value of each stat before any upgrade, class or transient
    /// bonus. Unlisted stats start at zero.
    pub base_stats: BTreeMap<StatKey, f64>,
    /// Base execute cap. `None` leaves execute uncapped.
    pub base_execute_cap: Option<f64>,
    /// Largest frame delta fed into the timers, in milliseconds.
    pub max_frame_delta_ms: f64,
    /// Interval between periodic combat ticks (poison).
    pub poison_tick_ms: f64,
    /// Interval at which one tap-frenzy stack ages by one unit.
    pub frenzy_decay_ms: f64,
    /// Upgrade cards offered per level-up.
    pub offer_count: usize,
    /// Poison duration in ticks when the stat is not positive.
    pub default_poison_duration: u32,
    /// Poison stack cap when the stat is below one.
    pub default_poison_max_stacks: usize,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_FRAME_DELTA_MS: f64 = 200.0;
    pub const DEFAULT_POISON_TICK_MS: f64 = 1000.0;
    pub const DEFAULT_FRENZY_DECAY_MS: f64 = 1000.0;
    pub const DEFAULT_OFFER_COUNT: usize = 3;

    pub fn new() -> Self {
        Self {
            base_stats: Self::default_base_stats(),
            base_execute_cap: None,
            max_frame_delta_ms: Self::DEFAULT_MAX_FRAME_DELTA_MS,
            poison_tick_ms: Self::DEFAULT_POISON_TICK_MS,
            frenzy_decay_ms: Self::DEFAULT_FRENZY_DECAY_MS,
            offer_count: Self::DEFAULT_OFFER_COUNT,
            default_poison_duration: PoisonSystem::DEFAULT_DURATION,
            default_poison_max_stacks: PoisonSystem::DEFAULT_MAX_STACKS,
        }
    }

    /// Base values a fresh run starts from.
    pub fn default_base_stats() -> BTreeMap<StatKey, f64> {
        use StatKey::*;
        [
            (Damage, 1.0),
            (AttackSpeed, 1.0),
            (CritMultiplier, 2.0),
            (DamageMultiplier, 1.0),
            (PoisonDuration, 5.0),
            (PoisonMaxStacks, 5.0),
            (GoldMultiplier, 1.0),
            (XpMultiplier, 1.0),
            (BossTime, 30.0),
            (TapFrenzyBonus, 0.05),
            (TapFrenzyDuration, 3.0),
            (TapFrenzyMaxStacks, 10.0),
        ]
        .into_iter()
        .collect()
    }

    pub fn base_stat(&self, stat: StatKey) -> f64 {
        self.base_stats.get(&stat).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn with_base_stat(mut self, stat: StatKey, value: f64) -> Self {
        self.base_stats.insert(stat, value);
        self
    }

    /// Fresh stat pipeline seeded from this configuration.
    pub fn stat_pipeline(&self) -> StatPipeline {
        StatPipeline::new(self.base_stats.clone(), self.base_execute_cap)
    }

    /// Poison system using this configuration's fallbacks.
    pub fn poison_system(&self) -> PoisonSystem {
        PoisonSystem::new(self.default_poison_duration, self.default_poison_max_stacks)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
