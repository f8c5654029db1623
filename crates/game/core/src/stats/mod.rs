//! Stat System - per-stat layered pipelines.
//!
//! # Architecture
//!
//! ```text
//! StatStep        pure f64 -> f64 transformation
//!      ↓
//! PipelineLayer   ordered steps + memoized (input, result)
//!      ↓
//! StatPipeline    five layers per StatKey: base → permanent → class → transient → clamp
//!      ↓
//! PlayerStats     flat snapshot read by combat systems
//! ```
//!
//! ## Principles
//!
//! 1. **Rebuild, never patch**: a layer's steps are replaced wholesale from
//!    the full modifier set whenever their source changes
//! 2. **Forward invalidation**: dirtying layer `i` dirties every layer after it
//! 3. **Non-negative output**: the clamp layer is always last
//! 4. **No rounding**: callers floor damage where they need whole numbers

pub mod class;
pub mod keys;
pub mod layer;
pub mod pipeline;
pub mod player;
pub mod step;
pub mod upgrade;

pub use class::{ClassTable, PlayerClass};
pub use keys::StatKey;
pub use layer::{PipelineLayer, compute_layered, create_layer, dirty_layers, rebuild_layer};
pub use pipeline::{LayerKind, StatPipeline};
pub use player::PlayerStats;
pub use step::{StatStep, StepCondition, StepFn};
pub use upgrade::{Rarity, StatModifier, Upgrade, UpgradeCatalog};
