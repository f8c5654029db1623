//! System definitions composed by the combat pipeline.
//!
//! A system is a self-contained unit (crit, poison, ...) that declares which
//! hit types it transforms or reacts to and which lifecycle hooks it wants.
//! Systems never see each other's state: the runner hands each hook the
//! system's own state and commits whatever state the hook returns.
//!
//! # Hook contracts
//!
//! - Returning `None` from a transform, reactor or before-attack hook means
//!   "decline": no state change, no effect, the hit is unchanged.
//! - Hooks are synchronous and perform no I/O. A panic inside a hook is a bug
//!   in that system and is not caught.

use std::any::Any;
use std::fmt;

use bitflags::bitflags;
use serde_json::Value;

use super::context::{AttackContext, KillContext, RngSource, TickContext};
use super::effect::PipelineEffect;
use super::hit::{HitType, PipelineHit};
use crate::stats::PlayerStats;

bitflags! {
    /// Lifecycle hooks a system opts into.
    ///
    /// Transform and reactor capabilities are implied by non-empty
    /// [`SystemDefinition::transforms_from`] / [`SystemDefinition::reacts_to`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SystemHooks: u8 {
        const BEFORE_ATTACK = 1 << 0;
        const TICK          = 1 << 1;
        const KILL          = 1 << 2;
        const EFFECTS       = 1 << 3;
    }
}

/// Result of a before-attack hook that accepted.
#[derive(Clone, Debug)]
pub struct BeforeAttack<S> {
    pub state: S,
    /// When true, `hits` replace the whole attack and no transforms run.
    pub skip: bool,
    pub hits: Vec<PipelineHit>,
}

impl<S> BeforeAttack<S> {
    /// Commit state and let the attack proceed normally.
    pub fn proceed(state: S) -> Self {
        Self {
            state,
            skip: false,
            hits: Vec::new(),
        }
    }

    /// Commit state and replace the attack with `hits`.
    pub fn short_circuit(state: S, hits: Vec<PipelineHit>) -> Self {
        Self {
            state,
            skip: true,
            hits,
        }
    }
}

/// Result of a transform that accepted.
#[derive(Clone, Debug)]
pub struct Transformed<S> {
    pub state: S,
    pub hit: PipelineHit,
}

/// Result of a reactor that accepted.
#[derive(Clone, Debug)]
pub struct Reaction<S> {
    pub state: S,
    pub effects: Vec<PipelineEffect>,
}

impl<S> Reaction<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: PipelineEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Result of a periodic tick.
#[derive(Clone, Debug)]
pub struct TickOutcome<S> {
    pub state: S,
    pub damage: f64,
    pub hit_type: HitType,
}

impl<S> TickOutcome<S> {
    /// Tick that dealt no damage.
    pub fn idle(state: S) -> Self {
        Self {
            state,
            damage: 0.0,
            hit_type: HitType::HIT,
        }
    }
}

/// A combat system with private state of type [`SystemDefinition::State`].
pub trait SystemDefinition: Send + Sync + 'static {
    type State: Clone + fmt::Debug + Send + Sync + 'static;

    /// Unique id; effects address systems by this id.
    fn id(&self) -> &'static str;

    fn initial_state(&self) -> Self::State;

    /// Ordering among before-attack hooks and transforms. Lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    fn hooks(&self) -> SystemHooks {
        SystemHooks::empty()
    }

    /// Gate evaluated by `refresh_systems`. Inactive systems are skipped by
    /// every hook except effect delivery.
    fn is_active(&self, _stats: &PlayerStats) -> bool {
        true
    }

    fn transforms_from(&self) -> &'static [HitType] {
        &[]
    }

    fn reacts_to(&self) -> &'static [HitType] {
        &[]
    }

    fn before_attack(
        &self,
        _state: &Self::State,
        _ctx: &mut AttackContext<'_>,
        _stats: &PlayerStats,
    ) -> Option<BeforeAttack<Self::State>> {
        None
    }

    fn transform_hit(
        &self,
        _state: &Self::State,
        _hit: &PipelineHit,
        _stats: &PlayerStats,
        _rng: &mut dyn RngSource,
    ) -> Option<Transformed<Self::State>> {
        None
    }

    fn on_hit(
        &self,
        _state: &Self::State,
        _hit: &PipelineHit,
        _stats: &PlayerStats,
    ) -> Option<Reaction<Self::State>> {
        None
    }

    fn on_tick(
        &self,
        state: &Self::State,
        _stats: &PlayerStats,
        _ctx: &mut TickContext<'_>,
    ) -> TickOutcome<Self::State> {
        TickOutcome::idle(state.clone())
    }

    fn on_kill(&self, state: &Self::State, _ctx: &KillContext) -> Self::State {
        state.clone()
    }

    fn handle_effect(&self, state: &Self::State, _action: &str, _payload: &Value) -> Self::State {
        state.clone()
    }
}

/// Type-erased system paired with the state slot the runner owns for it.
///
/// Each method runs the matching [`SystemDefinition`] hook against the slot
/// and commits the returned state.
pub trait AnySystem: Send + Sync {
    fn id(&self) -> &'static str;
    fn priority(&self) -> i32;
    fn hooks(&self) -> SystemHooks;
    fn transforms_from(&self) -> &'static [HitType];
    fn reacts_to(&self) -> &'static [HitType];
    fn is_active(&self, stats: &PlayerStats) -> bool;

    fn reset(&mut self);
    fn state_any(&self) -> &dyn Any;

    /// Returns `(skip, hits)` when the hook accepted.
    fn run_before_attack(
        &mut self,
        ctx: &mut AttackContext<'_>,
        stats: &PlayerStats,
    ) -> Option<(bool, Vec<PipelineHit>)>;
    fn run_transform(
        &mut self,
        hit: &PipelineHit,
        stats: &PlayerStats,
        rng: &mut dyn RngSource,
    ) -> Option<PipelineHit>;
    fn run_on_hit(&mut self, hit: &PipelineHit, stats: &PlayerStats)
    -> Option<Vec<PipelineEffect>>;
    fn run_on_tick(&mut self, stats: &PlayerStats, ctx: &mut TickContext<'_>) -> (f64, HitType);
    fn run_on_kill(&mut self, ctx: &KillContext);
    fn run_handle_effect(&mut self, action: &str, payload: &Value);
}

/// Owned, type-erased system ready to hand to the runner.
pub type BoxedSystem = Box<dyn AnySystem>;

/// Boxes a system together with a fresh state slot.
pub fn boxed<S: SystemDefinition>(definition: S) -> BoxedSystem {
    let state = definition.initial_state();
    Box::new(SystemSlot { definition, state })
}

struct SystemSlot<S: SystemDefinition> {
    definition: S,
    state: S::State,
}

impl<S: SystemDefinition> AnySystem for SystemSlot<S> {
    fn id(&self) -> &'static str {
        self.definition.id()
    }

    fn priority(&self) -> i32 {
        self.definition.priority()
    }

    fn hooks(&self) -> SystemHooks {
        self.definition.hooks()
    }

    fn transforms_from(&self) -> &'static [HitType] {
        self.definition.transforms_from()
    }

    fn reacts_to(&self) -> &'static [HitType] {
        self.definition.reacts_to()
    }

    fn is_active(&self, stats: &PlayerStats) -> bool {
        self.definition.is_active(stats)
    }

    fn reset(&mut self) {
        self.state = self.definition.initial_state();
    }

    fn state_any(&self) -> &dyn Any {
        &self.state
    }

    fn run_before_attack(
        &mut self,
        ctx: &mut AttackContext<'_>,
        stats: &PlayerStats,
    ) -> Option<(bool, Vec<PipelineHit>)> {
        let outcome = self.definition.before_attack(&self.state, ctx, stats)?;
        self.state = outcome.state;
        Some((outcome.skip, outcome.hits))
    }

    fn run_transform(
        &mut self,
        hit: &PipelineHit,
        stats: &PlayerStats,
        rng: &mut dyn RngSource,
    ) -> Option<PipelineHit> {
        let outcome = self.definition.transform_hit(&self.state, hit, stats, rng)?;
        self.state = outcome.state;
        Some(outcome.hit)
    }

    fn run_on_hit(
        &mut self,
        hit: &PipelineHit,
        stats: &PlayerStats,
    ) -> Option<Vec<PipelineEffect>> {
        let outcome = self.definition.on_hit(&self.state, hit, stats)?;
        self.state = outcome.state;
        Some(outcome.effects)
    }

    fn run_on_tick(&mut self, stats: &PlayerStats, ctx: &mut TickContext<'_>) -> (f64, HitType) {
        let outcome = self.definition.on_tick(&self.state, stats, ctx);
        self.state = outcome.state;
        (outcome.damage, outcome.hit_type)
    }

    fn run_on_kill(&mut self, ctx: &KillContext) {
        self.state = self.definition.on_kill(&self.state, ctx);
    }

    fn run_handle_effect(&mut self, action: &str, payload: &Value) {
        self.state = self.definition.handle_effect(&self.state, action, payload);
    }
}
