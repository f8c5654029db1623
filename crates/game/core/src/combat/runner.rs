//! Combat pipeline runner.
//!
//! Resolves attacks, ticks and kills by dispatching to registered systems.
//!
//! ## Attack flow
//!
//! ```text
//! before-attack (priority order) ── short-circuit? ──► reactors ► effects ► result
//!        │ no
//!        ▼
//! 1 + multiStrike base hits (overkill carry on strike 0)
//!        │ per hit, strike order
//!        ▼
//! transforms for the hit's type (priority order)
//!   └─ type changed? run unrun transforms for the new type
//!        ▼
//! accumulate damage ► reactors for the final type ► queue effects
//!        ▼
//! deliver queued effects ► overkill carry ► result
//! ```
//!
//! Effects are only delivered once every hit has been resolved, so nothing an
//! effect does can change a hit that was already produced.

use std::collections::HashMap;

use tracing::debug;

use super::context::{AttackContext, KillContext, RngSource, TickContext};
use super::effect::PipelineEffect;
use super::hit::{HitType, PipelineHit};
use super::result::{AttackResult, TickDamage, overkill_carry};
use super::system::{BoxedSystem, SystemHooks};
use crate::stats::PlayerStats;

/// Lookup tables rebuilt by [`CombatPipelineRunner::refresh_systems`].
#[derive(Debug, Default)]
struct SystemIndex {
    before_attack: Vec<usize>,
    transforms: HashMap<HitType, Vec<usize>>,
    reactors: HashMap<HitType, Vec<usize>>,
    tick: Vec<usize>,
    kill: Vec<usize>,
}

/// Orchestrates a fixed set of systems and owns every system's state.
pub struct CombatPipelineRunner {
    systems: Vec<BoxedSystem>,
    by_id: HashMap<&'static str, usize>,
    index: SystemIndex,
}

impl CombatPipelineRunner {
    /// Creates a runner over `systems` in registration order.
    ///
    /// The index starts empty: call [`refresh_systems`](Self::refresh_systems)
    /// before the first attack.
    pub fn new(systems: Vec<BoxedSystem>) -> Self {
        let mut by_id = HashMap::with_capacity(systems.len());
        for (i, system) in systems.iter().enumerate() {
            if by_id.insert(system.id(), i).is_some() {
                tracing::warn!(
                    target: "game_core::combat",
                    system = system.id(),
                    "Duplicate system id; effects will reach the last registration"
                );
            }
        }

        Self {
            systems,
            by_id,
            index: SystemIndex::default(),
        }
    }

    /// Rebuilds the dispatch index from the systems active under `stats`.
    ///
    /// Must run whenever stats change, and at least once per attack.
    pub fn refresh_systems(&mut self, stats: &PlayerStats) {
        let active: Vec<usize> = (0..self.systems.len())
            .filter(|&i| self.systems[i].is_active(stats))
            .collect();

        // Stable sort keeps registration order among equal priorities.
        let mut by_priority = active.clone();
        by_priority.sort_by_key(|&i| self.systems[i].priority());

        let mut index = SystemIndex::default();
        for &i in &by_priority {
            let system = &self.systems[i];
            if system.hooks().contains(SystemHooks::BEFORE_ATTACK) {
                index.before_attack.push(i);
            }
            for hit_type in system.transforms_from() {
                index.transforms.entry(*hit_type).or_default().push(i);
            }
        }
        for &i in &active {
            let system = &self.systems[i];
            for hit_type in system.reacts_to() {
                index.reactors.entry(*hit_type).or_default().push(i);
            }
            if system.hooks().contains(SystemHooks::TICK) {
                index.tick.push(i);
            }
            if system.hooks().contains(SystemHooks::KILL) {
                index.kill.push(i);
            }
        }

        self.index = index;
    }

    /// Resolves one attack.
    pub fn run_attack(&mut self, stats: &PlayerStats, ctx: &mut AttackContext<'_>) -> AttackResult {
        let mut effects = Vec::new();

        let mut short_circuit = None;
        for &i in &self.index.before_attack {
            // A non-skipping hook has already committed its state; keep going.
            if let Some((true, hits)) = self.systems[i].run_before_attack(ctx, stats) {
                short_circuit = Some((self.systems[i].id(), hits));
                break;
            }
        }

        if let Some((system_id, hits)) = short_circuit {
            debug!(
                target: "game_core::combat",
                system = system_id,
                hits = hits.len(),
                "Attack short-circuited"
            );

            let total_damage: f64 = hits.iter().map(|hit| hit.damage).sum();
            for hit in &hits {
                react(&mut self.systems, &self.index, hit, stats, &mut effects);
            }
            self.dispatch_effects(effects);

            return AttackResult {
                hits,
                total_damage,
                overkill_damage_out: overkill_carry(
                    stats.overkill_enabled(),
                    ctx.enemy_health,
                    total_damage,
                ),
                short_circuited_by: Some(system_id),
            };
        }

        let strikes = stats.strike_count();
        let mut hits = Vec::with_capacity(strikes);
        let mut total_damage = 0.0;

        for strike in 0..strikes {
            let mut damage = stats.damage;
            if strike == 0 {
                damage += ctx.overkill_damage;
            }

            let hit = transform(
                &mut self.systems,
                &self.index,
                PipelineHit::strike(damage, strike),
                stats,
                &mut *ctx.rng,
            );
            total_damage += hit.damage;
            react(&mut self.systems, &self.index, &hit, stats, &mut effects);
            hits.push(hit);
        }

        self.dispatch_effects(effects);

        AttackResult {
            hits,
            total_damage,
            overkill_damage_out: overkill_carry(
                stats.overkill_enabled(),
                ctx.enemy_health,
                total_damage,
            ),
            short_circuited_by: None,
        }
    }

    /// Runs every active tick system. Only ticks that dealt damage are reported.
    pub fn run_tick(&mut self, stats: &PlayerStats, ctx: &mut TickContext<'_>) -> Vec<TickDamage> {
        let mut dealt = Vec::new();
        for &i in &self.index.tick {
            let (damage, hit_type) = self.systems[i].run_on_tick(stats, ctx);
            if damage > 0.0 {
                dealt.push(TickDamage {
                    system_id: self.systems[i].id(),
                    damage,
                    hit_type,
                });
            }
        }
        dealt
    }

    /// Runs every active kill system.
    pub fn run_kill(&mut self, ctx: &KillContext) {
        for &i in &self.index.kill {
            self.systems[i].run_on_kill(ctx);
        }
    }

    /// Reinitializes every system's state. The registered systems are kept.
    pub fn reset(&mut self) {
        for system in &mut self.systems {
            system.reset();
        }
    }

    /// Reads the state of system `id`, if it is registered with state type `T`.
    pub fn state<T: 'static>(&self, id: &str) -> Option<&T> {
        let &i = self.by_id.get(id)?;
        self.systems[i].state_any().downcast_ref::<T>()
    }

    /// Ids of every registered system, in registration order.
    pub fn system_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|system| system.id())
    }

    /// True when `id` is in any dispatch list after the last refresh.
    pub fn is_active(&self, id: &str) -> bool {
        let Some(&i) = self.by_id.get(id) else {
            return false;
        };
        let index = &self.index;
        index.before_attack.contains(&i)
            || index.tick.contains(&i)
            || index.kill.contains(&i)
            || index.transforms.values().any(|list| list.contains(&i))
            || index.reactors.values().any(|list| list.contains(&i))
    }

    fn dispatch_effects(&mut self, effects: Vec<PipelineEffect>) {
        for effect in effects {
            match self.by_id.get(effect.target) {
                Some(&i) if self.systems[i].hooks().contains(SystemHooks::EFFECTS) => {
                    self.systems[i].run_handle_effect(&effect.action, &effect.payload);
                }
                _ => debug!(
                    target: "game_core::combat",
                    system = effect.target,
                    action = %effect.action,
                    "Dropping effect with no handler"
                ),
            }
        }
    }
}

/// Runs transforms for `hit`'s type, then any not-yet-run transforms for the
/// type it ended up with. Each system runs at most once per hit.
fn transform(
    systems: &mut [BoxedSystem],
    index: &SystemIndex,
    mut hit: PipelineHit,
    stats: &PlayerStats,
    rng: &mut dyn RngSource,
) -> PipelineHit {
    let original = hit.hit_type;
    let mut ran: Vec<usize> = Vec::new();

    if let Some(list) = index.transforms.get(&original) {
        for &i in list {
            ran.push(i);
            if let Some(next) = systems[i].run_transform(&hit, stats, rng) {
                hit = next;
            }
        }
    }

    if hit.hit_type != original
        && let Some(list) = index.transforms.get(&hit.hit_type)
    {
        for &i in list {
            if ran.contains(&i) {
                continue;
            }
            ran.push(i);
            if let Some(next) = systems[i].run_transform(&hit, stats, rng) {
                hit = next;
            }
        }
    }

    hit
}

fn react(
    systems: &mut [BoxedSystem],
    index: &SystemIndex,
    hit: &PipelineHit,
    stats: &PlayerStats,
    effects: &mut Vec<PipelineEffect>,
) {
    let Some(list) = index.reactors.get(&hit.hit_type) else {
        return;
    };
    for &i in list {
        if let Some(mut emitted) = systems[i].run_on_hit(hit, stats) {
            effects.append(&mut emitted);
        }
    }
}
