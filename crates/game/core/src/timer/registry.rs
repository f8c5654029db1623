use std::fmt;

use tracing::{error, trace};

/// Callback fired when a timer expires.
///
/// Receives the caller's context and the registry itself, so a callback may
/// register, replace or remove timers (including its own) while it runs.
pub type ExpireFn<C> = Box<dyn FnMut(&mut C, &mut TimerRegistry<C>)>;

/// A virtual countdown.
pub struct GameTimer<C> {
    /// Milliseconds until expiry. Fires once this is `<= 0`.
    pub remaining: f64,
    pub on_expire: ExpireFn<C>,
    /// Re-arm interval. `None` makes the timer one-shot.
    pub repeat: Option<f64>,
}

impl<C> GameTimer<C> {
    /// One-shot timer expiring after `remaining` milliseconds.
    pub fn once<F>(remaining: f64, on_expire: F) -> Self
    where
        F: FnMut(&mut C, &mut TimerRegistry<C>) + 'static,
    {
        Self {
            remaining,
            on_expire: Box::new(on_expire),
            repeat: None,
        }
    }

    /// Timer firing every `interval` milliseconds, first after one interval.
    pub fn repeating<F>(interval: f64, on_expire: F) -> Self
    where
        F: FnMut(&mut C, &mut TimerRegistry<C>) + 'static,
    {
        Self {
            remaining: interval,
            on_expire: Box::new(on_expire),
            repeat: Some(interval),
        }
    }

    /// Overrides the time until the first expiry.
    #[must_use]
    pub fn starting_in(mut self, remaining: f64) -> Self {
        self.remaining = remaining;
        self
    }
}

impl<C> fmt::Debug for GameTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameTimer")
            .field("remaining", &self.remaining)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

struct Entry<C> {
    name: String,
    /// Changes on every registration, so a firing can tell whether its
    /// callback replaced or removed the timer.
    generation: u64,
    remaining: f64,
    repeat: Option<f64>,
    /// `None` only while the callback is running.
    on_expire: Option<ExpireFn<C>>,
}

/// Named virtual timers advanced only by [`tick`](Self::tick).
///
/// Timers are kept in registration order; re-registering an existing name
/// replaces the timer in place.
pub struct TimerRegistry<C> {
    entries: Vec<Entry<C>>,
    next_generation: u64,
}

impl<C> TimerRegistry<C> {
    /// Bound on re-fires of one repeating timer within a single pass.
    pub const MAX_REPEAT_ITERATIONS: usize = 1000;
    /// Bound on scan rounds within a single `tick`.
    pub const MAX_ROUNDS: usize = 1000;

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_generation: 0,
        }
    }

    /// Registers `timer` under `name`, replacing any existing timer of that name.
    pub fn register(&mut self, name: impl Into<String>, timer: GameTimer<C>) {
        let name = name.into();
        let generation = self.next_generation;
        self.next_generation += 1;

        let entry = Entry {
            name,
            generation,
            remaining: timer.remaining,
            repeat: timer.repeat,
            on_expire: Some(timer.on_expire),
        };

        match self.position(&entry.name) {
            Some(pos) => self.entries[pos] = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Milliseconds until `name` expires.
    pub fn remaining(&self, name: &str) -> Option<f64> {
        self.position(name).map(|pos| self.entries[pos].remaining)
    }

    /// Cancels `name`. Returns whether it was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Advances every timer by `delta_ms` and fires whatever expired.
    ///
    /// The delta is subtracted once. Scan rounds then repeat until one fires
    /// nothing, so a single large delta cascades through repeats and
    /// self-re-registering chains. Each round walks the names registered when
    /// the round started.
    ///
    /// A zero, negative or NaN delta is a no-op. Returns the number of
    /// callbacks fired.
    pub fn tick(&mut self, delta_ms: f64, ctx: &mut C) -> usize {
        if !(delta_ms > 0.0) || self.entries.is_empty() {
            return 0;
        }

        for entry in &mut self.entries {
            entry.remaining -= delta_ms;
        }

        let mut fired = 0;
        let mut stalled: Vec<u64> = Vec::new();

        for round in 0.. {
            if round == Self::MAX_ROUNDS {
                error!(
                    target: "game_core::timer",
                    rounds = Self::MAX_ROUNDS,
                    timers = ?self.names().collect::<Vec<_>>(),
                    "Timer tick exceeded round limit; remaining expiries deferred"
                );
                break;
            }

            let snapshot: Vec<String> = self.names().map(str::to_owned).collect();
            let mut fired_this_round = 0;

            for name in &snapshot {
                let Some(pos) = self.position(name) else {
                    continue;
                };
                let entry = &self.entries[pos];
                if entry.remaining > 0.0 || stalled.contains(&entry.generation) {
                    continue;
                }
                let repeat = entry.repeat;

                fired_this_round += match repeat {
                    Some(interval) => self.fire_repeating(name, interval, ctx, &mut stalled),
                    None => self.fire_once(name, ctx),
                };
            }

            if fired_this_round == 0 {
                break;
            }
            fired += fired_this_round;
        }

        fired
    }

    fn fire_once(&mut self, name: &str, ctx: &mut C) -> usize {
        let Some((generation, remaining, mut callback)) = self.take_callback(name) else {
            return 0;
        };
        callback(ctx, self);
        trace!(target: "game_core::timer", timer = name, "Timer fired");

        let overflow = -remaining;
        if let Some(pos) = self.position(name) {
            let entry = &mut self.entries[pos];
            if entry.generation == generation {
                self.entries.remove(pos);
            } else {
                // Re-registered during its own callback: the new timer inherits
                // the time that elapsed past this expiry.
                entry.remaining -= overflow;
            }
        }
        1
    }

    fn fire_repeating(
        &mut self,
        name: &str,
        interval: f64,
        ctx: &mut C,
        stalled: &mut Vec<u64>,
    ) -> usize {
        let mut fired = 0;

        loop {
            let Some((generation, _, mut callback)) = self.take_callback(name) else {
                return fired;
            };
            callback(ctx, self);
            fired += 1;

            // Removed or replaced during the callback: the old timer is gone.
            let Some(pos) = self.position(name) else {
                return fired;
            };
            let entry = &mut self.entries[pos];
            if entry.generation != generation {
                return fired;
            }

            entry.on_expire = Some(callback);
            entry.remaining += interval;
            if entry.remaining > 0.0 {
                return fired;
            }

            if fired >= Self::MAX_REPEAT_ITERATIONS {
                error!(
                    target: "game_core::timer",
                    timer = name,
                    interval,
                    remaining = entry.remaining,
                    "Repeating timer hit iteration limit; deferring to next tick"
                );
                stalled.push(generation);
                return fired;
            }
        }
    }

    /// Detaches the callback of `name` for the duration of a firing.
    fn take_callback(&mut self, name: &str) -> Option<(u64, f64, ExpireFn<C>)> {
        let pos = self.position(name)?;
        let entry = &mut self.entries[pos];
        let callback = entry.on_expire.take()?;
        Some((entry.generation, entry.remaining, callback))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

impl<C> Default for TimerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for TimerRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| (&entry.name, (entry.remaining, entry.repeat))),
            )
            .finish()
    }
}
