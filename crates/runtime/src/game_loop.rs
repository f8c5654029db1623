//! Frame-driven scheduling for a [`GameSession`].
//!
//! ```text
//! frame(now) ──► delta (capped) ──► TimerRegistry::tick
//!                                      │
//!        ┌──────────────┬──────────────┼──────────────┬──────────────┐
//!   attackCooldown   bossTimer     poisonTick     frenzyDecay    autoclicker
//!   (hold chain)     (one-shot)    (repeating)    (repeating)    (repeating)
//! ```
//!
//! Every gameplay mutation happens inside a timer callback or a direct input
//! call (`pointer_down`, `choose_upgrade`). After each callback the loop
//! re-syncs the timers that depend on session state: a newly spawned boss
//! starts its countdown, and a changed autoclicker speed re-arms its timer.

use game_core::{GameTimer, TimerRegistry, attack_interval_ms};
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::events::{EventBus, GameEvent};
use crate::session::GameSession;

pub const ATTACK_COOLDOWN: &str = "attackCooldown";
pub const BOSS_TIMER: &str = "bossTimer";
pub const POISON_TICK: &str = "poisonTick";
pub const FRENZY_DECAY: &str = "frenzyDecay";
pub const AUTOCLICKER: &str = "autoclicker";

type Timers = TimerRegistry<LoopState>;

/// Everything timer callbacks may touch.
pub struct LoopState {
    pub session: GameSession,
    pointer_down: bool,
    /// Serial of the boss whose countdown is armed.
    boss_serial: Option<u64>,
    /// Speed the autoclicker timer was armed with.
    autoclicker_speed: f64,
}

impl LoopState {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            pointer_down: false,
            boss_serial: None,
            autoclicker_speed: 0.0,
        }
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }
}

/// Owns the session, its timers and the frame clock.
pub struct GameLoop {
    state: LoopState,
    timers: Timers,
    last_frame_ms: Option<f64>,
    paused: bool,
    elapsed_ms: f64,
    bus: Option<EventBus>,
}

impl GameLoop {
    pub fn new(session: GameSession) -> Self {
        let mut game_loop = Self {
            state: LoopState::new(session),
            timers: TimerRegistry::new(),
            last_frame_ms: None,
            paused: false,
            elapsed_ms: 0.0,
            bus: None,
        };
        game_loop.install_timers();
        game_loop
    }

    /// Publishes every event this loop produces on `bus` as well as returning it.
    #[must_use]
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.state.session
    }

    pub fn timers(&self) -> &TimerRegistry<LoopState> {
        &self.timers
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_pointer_down(&self) -> bool {
        self.state.pointer_down
    }

    /// Virtual time consumed by timer ticks so far.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Time left on the live boss countdown.
    pub fn boss_time_remaining_ms(&self) -> Option<f64> {
        self.timers.remaining(BOSS_TIMER)
    }

    /// Time until the next held attack. `None` when an attack is ready.
    pub fn attack_cooldown_ms(&self) -> Option<f64> {
        self.timers.remaining(ATTACK_COOLDOWN)
    }

    // ===== input =====

    /// Presses and holds. Attacks immediately unless an attack is on cooldown.
    pub fn pointer_down(&mut self) -> Vec<GameEvent> {
        self.state.pointer_down = true;
        if !self.paused && !self.timers.has(ATTACK_COOLDOWN) {
            strike(&mut self.state, &mut self.timers, true);
        }
        self.flush()
    }

    /// Releases the hold. A running cooldown still expires, but does not attack.
    pub fn pointer_up(&mut self) {
        self.state.pointer_down = false;
    }

    /// Picks slot `index` of the pending upgrade offer and returns the upgrade id.
    pub fn choose_upgrade(&mut self, index: usize) -> Result<String> {
        let id = self.state.session.choose_upgrade(index)?.id.clone();
        sync_timers(&mut self.state, &mut self.timers);
        Ok(id)
    }

    /// Drains events produced outside a frame, such as by `choose_upgrade`.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.flush()
    }

    // ===== clock =====

    /// Advances by the time since the previous frame, capped at
    /// `max_frame_delta_ms`. Paused loops consume nothing.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }
        let max_delta = self.state.session.config().max_frame_delta_ms;
        let delta = match self.last_frame_ms.replace(now_ms) {
            Some(previous) => (now_ms - previous).max(0.0).min(max_delta),
            None => 0.0,
        };
        self.advance(delta)
    }

    /// Ticks every timer by `delta_ms` with no cap.
    pub fn advance(&mut self, delta_ms: f64) -> Vec<GameEvent> {
        if delta_ms > 0.0 {
            self.elapsed_ms += delta_ms;
            let fired = self.timers.tick(delta_ms, &mut self.state);
            trace!(target: "runtime::game_loop", delta_ms, fired, "Tick");
        }
        self.flush()
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(target: "runtime::game_loop", elapsed_ms = self.elapsed_ms, "Paused");
        }
    }

    /// Resumes frame consumption. The first frame afterwards has zero delta.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_frame_ms = None;
            debug!(target: "runtime::game_loop", elapsed_ms = self.elapsed_ms, "Resumed");
        }
    }

    /// Starts a new run: cancels every timer and resets the session.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.state.session.reset();
        self.last_frame_ms = None;
        self.elapsed_ms = 0.0;
        self.install_timers();
        info!(target: "runtime::game_loop", "Run reset");
    }

    fn install_timers(&mut self) {
        self.state.boss_serial = None;
        self.state.autoclicker_speed = 0.0;

        let config = self.state.session.config();
        let poison_tick_ms = config.poison_tick_ms;
        let frenzy_decay_ms = config.frenzy_decay_ms;
        if poison_tick_ms > 0.0 {
            self.timers
                .register(POISON_TICK, GameTimer::repeating(poison_tick_ms, on_poison_tick));
        }
        if frenzy_decay_ms > 0.0 {
            self.timers
                .register(FRENZY_DECAY, GameTimer::repeating(frenzy_decay_ms, on_frenzy_decay));
        }
        sync_timers(&mut self.state, &mut self.timers);
    }

    fn flush(&mut self) -> Vec<GameEvent> {
        let events = self.state.session.drain_events();
        if let Some(bus) = &self.bus {
            for event in &events {
                bus.publish(event.clone());
            }
        }
        events
    }
}

/// Attacks now and, at a finite attack speed, arms the next cooldown.
fn strike(state: &mut LoopState, timers: &mut Timers, tap: bool) {
    if tap {
        state.session.tap();
    } else {
        state.session.attack();
    }

    let interval = attack_interval_ms(state.session.stats().attack_speed);
    if interval.is_finite() {
        timers.register(ATTACK_COOLDOWN, GameTimer::once(interval, on_attack_ready));
    }
    sync_timers(state, timers);
}

fn on_attack_ready(state: &mut LoopState, timers: &mut Timers) {
    if state.pointer_down {
        strike(state, timers, false);
    }
}

fn on_poison_tick(state: &mut LoopState, timers: &mut Timers) {
    let delta_ms = state.session.config().poison_tick_ms;
    state.session.combat_tick(delta_ms);
    sync_timers(state, timers);
}

fn on_frenzy_decay(state: &mut LoopState, _timers: &mut Timers) {
    state.session.decay_frenzy();
}

fn on_autoclick(state: &mut LoopState, timers: &mut Timers) {
    state.session.attack();
    sync_timers(state, timers);
}

/// Arms or cancels the timers that follow session state.
fn sync_timers(state: &mut LoopState, timers: &mut Timers) {
    let enemy = *state.session.enemy();
    if enemy.kind.is_boss() {
        if state.boss_serial != Some(enemy.serial) {
            let serial = enemy.serial;
            let limit = state.session.boss_time_limit_ms();
            timers.register(
                BOSS_TIMER,
                GameTimer::once(limit, move |state: &mut LoopState, timers: &mut Timers| {
                    state.session.boss_timeout(serial);
                    sync_timers(state, timers);
                }),
            );
            state.boss_serial = Some(serial);
            debug!(target: "runtime::game_loop", serial, limit_ms = limit, "Boss timer armed");
        }
    } else if state.boss_serial.take().is_some() {
        timers.remove(BOSS_TIMER);
    }

    let speed = state.session.stats().autoclicker_speed;
    if speed != state.autoclicker_speed {
        state.autoclicker_speed = speed;
        if speed > 0.0 {
            timers.register(AUTOCLICKER, GameTimer::repeating(1000.0 / speed, on_autoclick));
        } else {
            timers.remove(AUTOCLICKER);
        }
    }
}
