//! Execute: a chance to kill a non-boss enemy outright.

use crate::combat::context::{AttackContext, RngSource};
use crate::combat::hit::{HitType, PipelineHit};
use crate::combat::system::{BeforeAttack, SystemDefinition, SystemHooks};
use crate::stats::PlayerStats;

pub const EXECUTE_ID: &str = "execute";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteState {
    pub executions: u32,
}

/// Before-attack short-circuit dealing the enemy's current health as one
/// `executeHit`. Crit, damage multiplier and poison never see the attack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExecuteSystem;

impl ExecuteSystem {
    /// `min(chance, cap)`, where a missing cap leaves the chance unchanged and
    /// a cap of zero disables execute.
    pub fn effective_chance(stats: &PlayerStats) -> f64 {
        let chance = stats.execute_chance;
        chance.min(stats.execute_cap.unwrap_or(chance))
    }
}

impl SystemDefinition for ExecuteSystem {
    type State = ExecuteState;

    fn id(&self) -> &'static str {
        EXECUTE_ID
    }

    fn initial_state(&self) -> Self::State {
        ExecuteState::default()
    }

    fn hooks(&self) -> SystemHooks {
        SystemHooks::BEFORE_ATTACK
    }

    fn is_active(&self, stats: &PlayerStats) -> bool {
        stats.execute_chance > 0.0
    }

    fn before_attack(
        &self,
        state: &Self::State,
        ctx: &mut AttackContext<'_>,
        stats: &PlayerStats,
    ) -> Option<BeforeAttack<Self::State>> {
        if ctx.is_boss {
            return None;
        }

        let chance = Self::effective_chance(stats);
        if ctx.rng.next_f64() >= chance {
            return None;
        }

        let hit = PipelineHit::new(HitType::EXECUTE_HIT, ctx.enemy_health, 0);
        Some(BeforeAttack::short_circuit(
            ExecuteState {
                executions: state.executions + 1,
            },
            vec![hit],
        ))
    }
}
