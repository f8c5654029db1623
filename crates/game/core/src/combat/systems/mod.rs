//! Built-in combat systems.
//!
//! | id                 | hook / types                    | priority |
//! |--------------------|---------------------------------|----------|
//! | `execute`          | before-attack                   | 0        |
//! | `crit`             | transform `hit`                 | 20       |
//! | `damageMultiplier` | transform `hit`, `criticalHit`  | 90       |
//! | `poison`           | react `hit`, `criticalHit`; tick | 0       |

pub mod crit;
pub mod damage_multiplier;
pub mod execute;
pub mod poison;

pub use crit::{CRIT_ID, CRIT_MULTIPLIER_FIELD, CritState, CritSystem};
pub use damage_multiplier::{DAMAGE_MULTIPLIER_ID, DamageMultiplierSystem};
pub use execute::{EXECUTE_ID, ExecuteState, ExecuteSystem};
pub use poison::{POISON_ID, PoisonState, PoisonSystem};

use super::system::{BoxedSystem, boxed};

/// Every built-in system in registration order, with default poison fallbacks.
pub fn all_systems() -> Vec<BoxedSystem> {
    with_poison(PoisonSystem::default())
}

/// Every built-in system, with a caller-configured poison system.
pub fn with_poison(poison: PoisonSystem) -> Vec<BoxedSystem> {
    vec![
        boxed(ExecuteSystem),
        boxed(CritSystem),
        boxed(DamageMultiplierSystem),
        boxed(poison),
    ]
}
