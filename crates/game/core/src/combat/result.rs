//! Combat result types.

use super::hit::{HitType, PipelineHit};

/// Outcome of one resolved attack.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackResult {
    /// Final hits in strike order.
    pub hits: Vec<PipelineHit>,
    pub total_damage: f64,
    /// Excess damage to carry into the next enemy; zero unless overkill is enabled.
    pub overkill_damage_out: f64,
    /// Id of the before-attack system that replaced the attack, if any.
    pub short_circuited_by: Option<&'static str>,
}

impl AttackResult {
    pub fn has_hit_type(&self, hit_type: HitType) -> bool {
        self.hits.iter().any(|hit| hit.hit_type == hit_type)
    }
}

/// Damage dealt by one system during a periodic tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickDamage {
    pub system_id: &'static str,
    pub damage: f64,
    pub hit_type: HitType,
}

/// Overkill carried out of an attack.
///
/// Only positive when overkill is enabled and the attack dealt more than the
/// enemy's remaining health.
pub fn overkill_carry(overkill_enabled: bool, enemy_health: f64, total_damage: f64) -> f64 {
    let remaining = enemy_health - total_damage;
    if overkill_enabled && remaining < 0.0 {
        remaining.abs()
    } else {
        0.0
    }
}
