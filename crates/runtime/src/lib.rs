//! Runtime orchestration for a clicker combat run.
//!
//! This crate turns the pure combat core into a playable session. Consumers
//! build a [`GameSession`] from loaded content, hand it to a [`GameLoop`], and
//! feed it frames and pointer input. Everything the player should see comes
//! back as [`GameEvent`]s, either returned from each call or fanned out on an
//! [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`session`] owns enemies, rewards, leveling and upgrade offers
//! - [`game_loop`] owns the frame clock and every gameplay timer
//! - [`events`] provides domain events and the topic-based bus
pub mod error;
pub mod events;
pub mod game_loop;
pub mod session;

pub use error::{Result, SessionError};
pub use events::{EventBus, GameEvent, Topic};
pub use game_loop::{
    ATTACK_COOLDOWN, AUTOCLICKER, BOSS_TIMER, FRENZY_DECAY, GameLoop, LoopState, POISON_TICK,
};
pub use session::{Enemy, GameSession};
