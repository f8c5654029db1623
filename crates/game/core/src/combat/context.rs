//! Per-call inputs for attacks, ticks and kills, plus the RNG seam.

/// Source of uniform rolls in `[0, 1)`.
///
/// Every roll in the combat core goes through this trait, so tests can feed
/// fixed or sequenced values. Any `FnMut() -> f64` is a source.
pub trait RngSource {
    fn next_f64(&mut self) -> f64;
}

impl<F> RngSource for F
where
    F: FnMut() -> f64,
{
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// Replays a fixed list of rolls, cycling when exhausted.
///
/// An empty list always rolls `0.0`.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    rolls: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// Number of rolls drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RngSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}

/// Inputs for resolving one attack.
pub struct AttackContext<'a> {
    pub enemy_health: f64,
    pub enemy_max_health: f64,
    /// Damage carried over from the previous attack's overkill; added to strike 0.
    pub overkill_damage: f64,
    pub is_boss: bool,
    pub rng: &'a mut dyn RngSource,
}

impl<'a> AttackContext<'a> {
    pub fn new(enemy_health: f64, enemy_max_health: f64, rng: &'a mut dyn RngSource) -> Self {
        Self {
            enemy_health,
            enemy_max_health,
            overkill_damage: 0.0,
            is_boss: false,
            rng,
        }
    }

    #[must_use]
    pub fn with_overkill(mut self, overkill_damage: f64) -> Self {
        self.overkill_damage = overkill_damage;
        self
    }

    #[must_use]
    pub fn boss(mut self, is_boss: bool) -> Self {
        self.is_boss = is_boss;
        self
    }
}

/// Inputs for a periodic tick.
pub struct TickContext<'a> {
    pub delta_ms: f64,
    pub rng: &'a mut dyn RngSource,
}

impl<'a> TickContext<'a> {
    pub fn new(delta_ms: f64, rng: &'a mut dyn RngSource) -> Self {
        Self { delta_ms, rng }
    }
}

/// Description of the enemy that just died.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KillContext {
    pub enemy_max_health: f64,
    pub is_boss: bool,
    pub is_chest: bool,
    pub is_boss_chest: bool,
    pub stage: u32,
}
