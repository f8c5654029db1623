//! Final damage scaling.

use crate::combat::context::RngSource;
use crate::combat::hit::{HitType, PipelineHit};
use crate::combat::system::{SystemDefinition, Transformed};
use crate::stats::PlayerStats;

pub const DAMAGE_MULTIPLIER_ID: &str = "damageMultiplier";

/// Floors `damage × damageMultiplier` for plain and critical hits.
///
/// Registered for both types at priority 90 so it scales whatever crit produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageMultiplierSystem;

impl DamageMultiplierSystem {
    pub const PRIORITY: i32 = 90;
}

impl SystemDefinition for DamageMultiplierSystem {
    type State = ();

    fn id(&self) -> &'static str {
        DAMAGE_MULTIPLIER_ID
    }

    fn initial_state(&self) -> Self::State {}

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn transforms_from(&self) -> &'static [HitType] {
        &[HitType::HIT, HitType::CRITICAL_HIT]
    }

    fn transform_hit(
        &self,
        _state: &Self::State,
        hit: &PipelineHit,
        stats: &PlayerStats,
        _rng: &mut dyn RngSource,
    ) -> Option<Transformed<Self::State>> {
        let mut hit = hit.clone();
        hit.damage = (hit.damage * stats.damage_multiplier).floor();
        Some(Transformed { state: (), hit })
    }
}
