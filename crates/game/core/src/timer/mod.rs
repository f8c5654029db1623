//! Virtual-time scheduling.
//!
//! Nothing here reads a wall clock. The owner of a [`TimerRegistry`] decides
//! how much time passes by calling [`TimerRegistry::tick`], usually once per
//! frame, and every cooldown, countdown and periodic effect fires from inside
//! that call.

mod registry;

pub use registry::{ExpireFn, GameTimer, TimerRegistry};

/// Milliseconds between attacks at `attack_speed` attacks per second.
///
/// Non-positive or NaN speeds never attack.
pub fn attack_interval_ms(attack_speed: f64) -> f64 {
    if attack_speed > 0.0 {
        1000.0 / attack_speed
    } else {
        f64::INFINITY
    }
}
