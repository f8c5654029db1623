//! Critical hits.

use crate::combat::context::RngSource;
use crate::combat::hit::{HitType, PipelineHit};
use crate::combat::system::{SystemDefinition, Transformed};
use crate::stats::PlayerStats;

pub const CRIT_ID: &str = "crit";

/// Field attached to `criticalHit` hits.
pub const CRIT_MULTIPLIER_FIELD: &str = "critMultiplier";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CritState {
    pub crits: u32,
}

/// Promotes `hit` to `criticalHit` on a successful roll.
#[derive(Clone, Copy, Debug, Default)]
pub struct CritSystem;

impl CritSystem {
    pub const PRIORITY: i32 = 20;

    /// Crit damage is always strictly greater than the base damage, even when
    /// flooring `damage × multiplier` would otherwise tie.
    pub fn crit_damage(damage: f64, multiplier: f64) -> f64 {
        (damage + 1.0).max((damage * multiplier).floor())
    }
}

impl SystemDefinition for CritSystem {
    type State = CritState;

    fn id(&self) -> &'static str {
        CRIT_ID
    }

    fn initial_state(&self) -> Self::State {
        CritState::default()
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn transforms_from(&self) -> &'static [HitType] {
        &[HitType::HIT]
    }

    fn transform_hit(
        &self,
        state: &Self::State,
        hit: &PipelineHit,
        stats: &PlayerStats,
        rng: &mut dyn RngSource,
    ) -> Option<Transformed<Self::State>> {
        if rng.next_f64() >= stats.crit_chance {
            return None;
        }

        let damage = Self::crit_damage(hit.damage, stats.crit_multiplier);
        Some(Transformed {
            state: CritState {
                crits: state.crits + 1,
            },
            hit: hit
                .clone()
                .retyped(HitType::CRITICAL_HIT, damage)
                .with_field(CRIT_MULTIPLIER_FIELD, stats.crit_multiplier),
        })
    }
}
