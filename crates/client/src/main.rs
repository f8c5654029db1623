//! Headless clicker client.
//!
//! Loads content, starts a session and drives its game loop from a tokio
//! interval for a fixed wall-clock duration. The pointer is held for the
//! whole run and every upgrade offer takes its first card.
//!
//! ```bash
//! CLICKER_SEED=7 CLICKER_TIME_SCALE=20 RUST_LOG=runtime=debug cargo run -p clicker-client
//! ```

mod config;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use game_content::{ContentFactory, GameContent};
use runtime::{EventBus, GameLoop, GameSession, Topic};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = ClientConfig::from_env();
    let seed = config.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, class = %config.class, ?config.duration, "Starting clicker run");

    let content = load_content(&config)?;
    let bus = EventBus::new();
    let reporter = tokio::spawn(report_progress(bus.clone()));

    let session = GameSession::seeded(content, config.class, seed);
    let mut game = GameLoop::new(session).with_event_bus(bus);
    run(&mut game, &config).await;

    // Dropping the loop drops the last sender, which ends the reporter.
    let summary = summarize(&game);
    drop(game);
    reporter.await.context("Progress reporter panicked")?;

    tracing::info!(%summary, "Run finished");
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn load_content(config: &ClientConfig) -> Result<GameContent> {
    match &config.content_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_all()
            .with_context(|| format!("Failed to load content from {}", dir.display())),
        None => GameContent::embedded().context("Embedded content is invalid"),
    }
}

async fn run(game: &mut GameLoop, config: &ClientConfig) {
    let mut interval = time::interval(config.frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let start = Instant::now();
    game.pointer_down();

    while start.elapsed() < config.duration {
        interval.tick().await;
        let now_ms = start.elapsed().as_secs_f64() * 1000.0 * config.time_scale;
        game.frame(now_ms);

        while game.session().pending_offer().is_some() {
            match game.choose_upgrade(0) {
                Ok(id) => tracing::info!(upgrade = %id, "Auto-picked upgrade"),
                Err(err) => {
                    tracing::warn!(%err, "Could not pick an upgrade");
                    break;
                }
            }
            game.take_events();
        }
    }

    game.pointer_up();
}

async fn report_progress(bus: EventBus) {
    let mut progress = bus.subscribe(Topic::Progress);
    let mut upgrades = bus.subscribe(Topic::Upgrades);
    drop(bus);

    loop {
        let event = tokio::select! {
            event = progress.recv() => event,
            event = upgrades.recv() => event,
        };
        match event {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!(target: "clicker::events", %json),
                Err(err) => tracing::warn!(%err, "Failed to encode event"),
            },
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Progress reporter fell behind");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn summarize(game: &GameLoop) -> String {
    let session = game.session();
    format!(
        "stage {} | level {} | kills {} | gold {:.0} | upgrades [{}] | {:.1}s virtual",
        session.stage(),
        session.level(),
        session.kills(),
        session.gold(),
        session.acquired().join(", "),
        game.elapsed_ms() / 1000.0,
    )
}
