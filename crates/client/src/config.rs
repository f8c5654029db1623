//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::PlayerClass;

/// Settings for one headless run.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Seed for every roll in the run. `None` picks one from the clock.
    pub seed: Option<u64>,
    /// Wall-clock length of the run.
    pub duration: Duration,
    pub class: PlayerClass,
    /// Directory overriding the embedded content files.
    pub content_dir: Option<PathBuf>,
    /// Real time between frames.
    pub frame_interval: Duration,
    /// Virtual milliseconds per real millisecond.
    pub time_scale: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: None,
            duration: Duration::from_secs(10),
            class: PlayerClass::None,
            content_dir: None,
            frame_interval: Duration::from_millis(16),
            time_scale: 1.0,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLICKER_SEED` - RNG seed (default: derived from the clock)
    /// - `CLICKER_DURATION_SECS` - Run length in seconds (default: 10)
    /// - `CLICKER_CLASS` - `none`, `warrior`, `rogue` or `alchemist` (default: none)
    /// - `CLICKER_CONTENT_DIR` - Content override directory (default: embedded)
    /// - `CLICKER_FRAME_MS` - Milliseconds between frames (default: 16)
    /// - `CLICKER_TIME_SCALE` - Virtual time multiplier (default: 1.0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("CLICKER_SEED");

        if let Some(secs) = read_env::<u64>("CLICKER_DURATION_SECS") {
            config.duration = Duration::from_secs(secs);
        }

        if let Some(class) = read_env::<PlayerClass>("CLICKER_CLASS") {
            config.class = class;
        }

        config.content_dir = env::var("CLICKER_CONTENT_DIR").ok().map(PathBuf::from);

        if let Some(ms) = read_env::<u64>("CLICKER_FRAME_MS") {
            config.frame_interval = Duration::from_millis(ms.max(1));
        }

        if let Some(scale) = read_env::<f64>("CLICKER_TIME_SCALE")
            && scale.is_finite()
            && scale > 0.0
        {
            config.time_scale = scale;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
