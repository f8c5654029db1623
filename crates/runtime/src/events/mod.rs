//! Domain events and the topic-based bus that fans them out.

mod bus;
mod game_event;

pub use bus::{EventBus, Topic};
pub use game_event::GameEvent;
