//! Poison: stacking damage over time.
//!
//! Every plain or critical strike adds one stack, so a multi-strike attack
//! adds one stack per strike. Each tick deals
//! `floor(poison × damageMultiplier) × stacks` and ages every stack by one.
//! Killing the enemy clears all stacks.
//!
//! Accepted effects:
//! - `"clear"`: drop every stack
//! - `"extend"` with `{"ticks": n}`: add `n` ticks to every stack

use serde_json::Value;

use super::crit::CritSystem;
use crate::combat::context::{KillContext, RngSource, TickContext};
use crate::combat::hit::{HitType, PipelineHit};
use crate::combat::stacks::{StackManager, StackPolicy};
use crate::combat::system::{Reaction, SystemDefinition, SystemHooks, TickOutcome};
use crate::stats::PlayerStats;

pub const POISON_ID: &str = "poison";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoisonState {
    /// Remaining ticks per stack, in insertion order.
    pub stacks: Vec<u32>,
}

#[derive(Clone, Copy, Debug)]
pub struct PoisonSystem {
    default_duration: u32,
    default_max_stacks: usize,
}

impl PoisonSystem {
    pub const DEFAULT_DURATION: u32 = 5;
    pub const DEFAULT_MAX_STACKS: usize = 5;

    /// Fallbacks used when the duration or max-stack stat is not positive.
    pub const fn new(default_duration: u32, default_max_stacks: usize) -> Self {
        Self {
            default_duration,
            default_max_stacks,
        }
    }

    fn duration(&self, stats: &PlayerStats) -> u32 {
        if stats.poison_duration > 0.0 {
            stats.poison_duration.round() as u32
        } else {
            self.default_duration
        }
    }

    fn manager(&self, stats: &PlayerStats) -> StackManager {
        if stats.poison_max_stacks >= 1.0 {
            StackManager::from_stat(stats.poison_max_stacks, StackPolicy::RefreshShortest)
        } else {
            StackManager::new(self.default_max_stacks, StackPolicy::RefreshShortest)
        }
    }
}

impl Default for PoisonSystem {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, Self::DEFAULT_MAX_STACKS)
    }
}

impl SystemDefinition for PoisonSystem {
    type State = PoisonState;

    fn id(&self) -> &'static str {
        POISON_ID
    }

    fn initial_state(&self) -> Self::State {
        PoisonState::default()
    }

    fn hooks(&self) -> SystemHooks {
        SystemHooks::TICK | SystemHooks::KILL | SystemHooks::EFFECTS
    }

    fn is_active(&self, stats: &PlayerStats) -> bool {
        stats.poison > 0.0
    }

    fn reacts_to(&self) -> &'static [HitType] {
        &[HitType::HIT, HitType::CRITICAL_HIT]
    }

    fn on_hit(
        &self,
        state: &Self::State,
        hit: &PipelineHit,
        stats: &PlayerStats,
    ) -> Option<Reaction<Self::State>> {
        if hit.is(HitType::EXECUTE_HIT) {
            return None;
        }

        let mut next = state.clone();
        self.manager(stats)
            .add(&mut next.stacks, self.duration(stats), 1);
        Some(Reaction::new(next))
    }

    fn on_tick(
        &self,
        state: &Self::State,
        stats: &PlayerStats,
        ctx: &mut TickContext<'_>,
    ) -> TickOutcome<Self::State> {
        if state.stacks.is_empty() {
            return TickOutcome::idle(state.clone());
        }

        let per_stack = (stats.poison * stats.damage_multiplier).floor();
        let mut damage = per_stack * state.stacks.len() as f64;
        let mut hit_type = HitType::POISON;

        if stats.poison_crit_chance > 0.0 && ctx.rng.next_f64() < stats.poison_crit_chance {
            damage = CritSystem::crit_damage(damage, stats.crit_multiplier);
            hit_type = HitType::POISON_CRIT;
        }

        let mut next = state.clone();
        self.manager(stats).tick(&mut next.stacks);

        TickOutcome {
            state: next,
            damage,
            hit_type,
        }
    }

    fn on_kill(&self, _state: &Self::State, _ctx: &KillContext) -> Self::State {
        PoisonState::default()
    }

    fn handle_effect(&self, state: &Self::State, action: &str, payload: &Value) -> Self::State {
        match action {
            "clear" => PoisonState::default(),
            "extend" => {
                let ticks = payload.get("ticks").and_then(Value::as_u64).unwrap_or(0) as u32;
                PoisonState {
                    stacks: state
                        .stacks
                        .iter()
                        .map(|remaining| remaining.saturating_add(ticks))
                        .collect(),
                }
            }
            _ => state.clone(),
        }
    }
}
