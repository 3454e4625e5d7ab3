//! Clock-driven playback.
//!
//! [`PlaybackDriver`] couples a [`Player`] with a [`Ticker`]. After every
//! operation the driver holds a ticker exactly when the player is playing:
//! entering `Playing` acquires one, leaving it (pause, manual navigation,
//! reaching the end, reset) releases it, and dropping the driver releases it
//! on every other path.

use std::time::Duration;

use peakscope_trace::Trace;
use tokio::sync::mpsc;

use crate::command::{Command, clamp_interval};
use crate::player::{PlaybackState, Player, TickOutcome};
use crate::ticker::{Tick, Ticker};

/// What a driver operation did, for the caller to decide what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// Cursor or state changed.
    Updated,
    /// Playback reached the last step and stopped.
    Finished,
    /// Nothing observable changed (stale tick, no-op command).
    Unchanged,
    /// The user asked to quit.
    Quit,
}

#[derive(Debug)]
pub struct PlaybackDriver {
    player: Player,
    interval: Duration,
    ticker: Option<Ticker>,
    generation: u64,
    tx: mpsc::Sender<Tick>,
    rx: mpsc::Receiver<Tick>,
}

impl PlaybackDriver {
    /// `interval` is clamped to `MIN_INTERVAL..=MAX_INTERVAL`.
    pub fn new(trace: Trace, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(8);
        Self {
            player: Player::new(trace),
            interval: clamp_interval(interval),
            ticker: None,
            generation: 0,
            tx,
            rx,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a timer is currently held.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Replace the trace; playback stops and rewinds.
    pub fn load(&mut self, trace: Trace) {
        self.player.load(trace);
        self.sync_ticker();
    }

    /// Change the tick interval, restarting the timer if playing.
    ///
    /// The interval is clamped like in [`PlaybackDriver::new`].
    pub fn set_interval(&mut self, interval: Duration) {
        let interval = clamp_interval(interval);
        if interval == self.interval {
            return;
        }
        self.interval = interval;
        if self.ticker.take().is_some() {
            self.sync_ticker();
        }
    }

    /// Apply a user command.
    pub fn apply(&mut self, command: Command) -> DriverEvent {
        let before = (self.player.cursor(), self.player.state());

        match command {
            Command::Play => self.player.play(),
            Command::Pause => self.player.pause(),
            Command::Toggle => self.player.toggle(),
            Command::Next => self.player.next(),
            Command::Prev => self.player.prev(),
            Command::Reset => self.player.reset(),
            Command::Seek(index) => self.player.seek(index),
            Command::Speed(interval) => {
                self.set_interval(interval);
                tracing::debug!(?interval, "playback interval changed");
                return DriverEvent::Unchanged;
            }
            Command::Quit => {
                self.player.pause();
                self.sync_ticker();
                return DriverEvent::Quit;
            }
        }
        self.sync_ticker();

        let after = (self.player.cursor(), self.player.state());
        tracing::debug!(?command, cursor = after.0, state = ?after.1, "command applied");
        if before == after {
            DriverEvent::Unchanged
        } else {
            DriverEvent::Updated
        }
    }

    /// Wait for the next tick from the current timer.
    ///
    /// Pends forever while no timer is held, so it is safe to race against
    /// other input in `tokio::select!`.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }

    /// Feed a tick to the player.
    pub fn on_tick(&mut self, tick: Tick) -> DriverEvent {
        if tick.generation != self.generation || self.ticker.is_none() {
            tracing::trace!(
                generation = tick.generation,
                current = self.generation,
                "stale tick dropped"
            );
            return DriverEvent::Unchanged;
        }

        let outcome = self.player.tick();
        self.sync_ticker();
        match outcome {
            TickOutcome::Advanced(cursor) => {
                tracing::debug!(cursor, "playback advanced");
                DriverEvent::Updated
            }
            TickOutcome::Finished => {
                tracing::debug!("playback finished");
                DriverEvent::Finished
            }
            TickOutcome::Ignored => DriverEvent::Unchanged,
        }
    }

    /// Play from the current position until the end, calling `on_step` after
    /// every advance.
    pub async fn play_to_end<F>(&mut self, mut on_step: F)
    where
        F: FnMut(&Player),
    {
        self.apply(Command::Play);
        while self.player.is_playing() {
            let Some(tick) = self.next_tick().await else {
                break;
            };
            if self.on_tick(tick) == DriverEvent::Updated {
                on_step(&self.player);
            }
        }
    }

    fn sync_ticker(&mut self) {
        match (self.player.state(), self.ticker.is_some()) {
            (PlaybackState::Playing, false) => {
                self.generation += 1;
                self.ticker = Some(Ticker::start(
                    self.interval,
                    self.generation,
                    self.tx.clone(),
                ));
            }
            (PlaybackState::Idle | PlaybackState::Paused, true) => {
                self.ticker = None;
            }
            _ => {}
        }
    }
}
