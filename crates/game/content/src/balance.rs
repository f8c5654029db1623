//! Numeric balance curves: enemy health, rewards and leveling.
//!
//! Every curve is `base × growth^(n-1)` for a 1-based stage or level, so
//! content can retune pacing without touching code.

/// What kind of enemy occupies the current slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyKind {
    Normal,
    Chest,
    BossChest,
    Boss,
}

impl EnemyKind {
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }

    pub const fn is_chest(self) -> bool {
        matches!(self, Self::Chest | Self::BossChest)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyCurve {
    pub base_health: f64,
    pub health_growth: f64,
    /// Kills needed to clear a normal stage.
    pub enemies_per_stage: u32,
    /// Every `boss_interval`-th stage ends in a boss.
    pub boss_interval: u32,
    pub boss_health_multiplier: f64,
    pub chest_health_multiplier: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoldCurve {
    pub base: f64,
    pub growth: f64,
    pub chest_multiplier: f64,
    pub boss_chest_multiplier: f64,
    pub boss_multiplier: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XpCurve {
    pub base: f64,
    pub growth: f64,
    pub boss_multiplier: f64,
    /// Experience needed to go from level 1 to 2.
    pub level_base: f64,
    pub level_growth: f64,
}

/// Complete balance table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BalanceTables {
    pub enemy: EnemyCurve,
    pub gold: GoldCurve,
    pub xp: XpCurve,
}

fn curve(base: f64, growth: f64, n: u32) -> f64 {
    base * growth.powi(n.saturating_sub(1) as i32)
}

impl BalanceTables {
    pub fn is_boss_stage(&self, stage: u32) -> bool {
        self.enemy.boss_interval > 0 && stage > 0 && stage % self.enemy.boss_interval == 0
    }

    /// Maximum health of an enemy of `kind` on `stage`, rounded up to a whole number.
    pub fn enemy_health(&self, stage: u32, kind: EnemyKind) -> f64 {
        let base = curve(self.enemy.base_health, self.enemy.health_growth, stage);
        let scaled = match kind {
            EnemyKind::Normal => base,
            EnemyKind::Chest | EnemyKind::BossChest => base * self.enemy.chest_health_multiplier,
            EnemyKind::Boss => base * self.enemy.boss_health_multiplier,
        };
        scaled.ceil().max(1.0)
    }

    /// Gold dropped by an enemy before the player's gold multiplier.
    pub fn gold_reward(&self, stage: u32, kind: EnemyKind) -> f64 {
        let base = curve(self.gold.base, self.gold.growth, stage);
        match kind {
            EnemyKind::Normal => base,
            EnemyKind::Chest => base * self.gold.chest_multiplier,
            EnemyKind::BossChest => base * self.gold.boss_chest_multiplier,
            EnemyKind::Boss => base * self.gold.boss_multiplier,
        }
    }

    /// Experience granted by an enemy before the player's xp multiplier.
    pub fn xp_reward(&self, stage: u32, kind: EnemyKind) -> f64 {
        let base = curve(self.xp.base, self.xp.growth, stage);
        match kind {
            EnemyKind::Boss => base * self.xp.boss_multiplier,
            _ => base,
        }
    }

    /// Experience required to advance from `level` to `level + 1`.
    pub fn xp_to_next_level(&self, level: u32) -> f64 {
        curve(self.xp.level_base, self.xp.level_growth, level).ceil()
    }
}

impl Default for BalanceTables {
    fn default() -> Self {
        Self {
            enemy: EnemyCurve {
                base_health: 10.0,
                health_growth: 1.15,
                enemies_per_stage: 10,
                boss_interval: 5,
                boss_health_multiplier: 8.0,
                chest_health_multiplier: 0.5,
            },
            gold: GoldCurve {
                base: 1.0,
                growth: 1.12,
                chest_multiplier: 5.0,
                boss_chest_multiplier: 20.0,
                boss_multiplier: 10.0,
            },
            xp: XpCurve {
                base: 1.0,
                growth: 1.1,
                boss_multiplier: 5.0,
                level_base: 10.0,
                level_growth: 1.25,
            },
        }
    }
}
