//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `game-core` owns the three coupled pieces of combat resolution:
//!
//! - [`stats`]: layered, memoized stat pipelines producing [`PlayerStats`]
//! - [`combat`]: the system-composing [`CombatPipelineRunner`] plus the
//!   built-in execute, crit, damage multiplier and poison systems
//! - [`timer`]: the virtual-time [`TimerRegistry`] every cooldown and
//!   periodic effect runs on
//!
//! Nothing here performs I/O or reads a clock; randomness enters only through
//! [`RngSource`].
pub mod combat;
pub mod config;
pub mod error;
pub mod stats;
pub mod timer;

pub use combat::{
    AttackContext, AttackResult, BoxedSystem, CombatPipelineRunner, HitType, KillContext,
    PipelineEffect, PipelineHit, RngSource, SequenceRng, StackManager, StackPolicy,
    SystemDefinition, SystemHooks, TickContext, TickDamage, all_systems,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError, UpgradeError};
pub use stats::{
    ClassTable, LayerKind, PlayerClass, PlayerStats, Rarity, StatKey, StatModifier, StatPipeline,
    StatStep, Upgrade, UpgradeCatalog,
};
pub use timer::{GameTimer, TimerRegistry, attack_interval_ms};
