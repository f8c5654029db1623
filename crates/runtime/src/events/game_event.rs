//! Domain events emitted by a session.
//!
//! Sessions never call into UI or audio. Everything observable is recorded as
//! a [`GameEvent`] and drained by the owner after each frame.

use game_content::EnemyKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// One resolved hit of an attack.
    Hit {
        hit_type: &'static str,
        damage: f64,
        strike: usize,
    },

    /// Damage dealt by a periodic combat tick.
    PoisonTick {
        hit_type: &'static str,
        damage: f64,
    },

    /// The current enemy died.
    EnemyKilled {
        stage: u32,
        kind: EnemyKind,
        gold: f64,
        xp: f64,
    },

    LevelUp { level: u32 },

    /// A new set of upgrade choices is waiting.
    UpgradeOffered { choices: Vec<String> },

    UpgradeAcquired { id: String },

    BossSpawned {
        stage: u32,
        max_health: f64,
        time_limit_ms: f64,
    },

    /// The boss timer ran out; the session fell back a stage.
    BossFailed { stage: u32 },

    StageAdvanced { stage: u32 },
}
