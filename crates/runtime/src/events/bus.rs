//! Topic-based event bus implementation.

use serde::Serialize;
use tokio::sync::broadcast;

use super::game_event::GameEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Topic {
    /// Hits and periodic damage
    Combat,
    /// Kills, stages, bosses and levels
    Progress,
    /// Upgrade offers and picks
    Upgrades,
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::Hit { .. } | GameEvent::PoisonTick { .. } => Topic::Combat,
            GameEvent::EnemyKilled { .. }
            | GameEvent::LevelUp { .. }
            | GameEvent::BossSpawned { .. }
            | GameEvent::BossFailed { .. }
            | GameEvent::StageAdvanced { .. } => Topic::Progress,
            GameEvent::UpgradeOffered { .. } | GameEvent::UpgradeAcquired { .. } => {
                Topic::Upgrades
            }
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; events are best-effort.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<GameEvent>,
    progress: broadcast::Sender<GameEvent>,
    upgrades: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            combat: broadcast::channel(capacity).0,
            progress: broadcast::channel(capacity).0,
            upgrades: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<GameEvent> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Progress => &self.progress,
            Topic::Upgrades => &self.upgrades,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: GameEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", ?topic, "No subscribers for topic");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut combat = bus.subscribe(Topic::Combat);
        let mut upgrades = bus.subscribe(Topic::Upgrades);

        bus.publish(GameEvent::LevelUp { level: 2 });
        bus.publish(GameEvent::PoisonTick {
            hit_type: "poison",
            damage: 4.0,
        });

        assert!(matches!(
            combat.try_recv(),
            Ok(GameEvent::PoisonTick { damage, .. }) if damage == 4.0
        ));
        assert!(upgrades.try_recv().is_err());
    }
}
