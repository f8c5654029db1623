//! Combat pipeline.
//!
//! Attacks, periodic ticks and kills are resolved by a
//! [`CombatPipelineRunner`] over a fixed list of [`SystemDefinition`]s. Each
//! system owns private state held by the runner; systems talk to each other
//! only through [`PipelineEffect`]s.
//!
//! All randomness enters through [`RngSource`], so every resolution is
//! reproducible from its roll sequence.

pub mod context;
pub mod effect;
pub mod hit;
pub mod result;
pub mod runner;
pub mod stacks;
pub mod system;
pub mod systems;

pub use context::{AttackContext, KillContext, RngSource, SequenceRng, TickContext};
pub use effect::PipelineEffect;
pub use hit::{HitType, PipelineHit};
pub use result::{AttackResult, TickDamage, overkill_carry};
pub use runner::CombatPipelineRunner;
pub use stacks::{StackManager, StackPolicy};
pub use system::{
    AnySystem, BeforeAttack, BoxedSystem, Reaction, SystemDefinition, SystemHooks, TickOutcome,
    Transformed, boxed,
};
pub use systems::all_systems;
