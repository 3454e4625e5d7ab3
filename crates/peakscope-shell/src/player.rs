//! Playback state machine over a trace.
//!
//! The player owns a [`Trace`] and a cursor into it. It has no clock: a
//! scheduler (see [`crate::driver`]) feeds it ticks while it is playing.
//!
//! ```text
//! Idle ──play──▶ Playing ──pause──▶ Paused ──play──▶ Playing
//!                   │ tick: advance, or stop at the last step
//!                   ▼
//!                 Paused
//! seek/next/prev: any state, Playing becomes Paused
//! reset/load:     any state, becomes Idle with cursor 0
//! ```

use peakscope_trace::{Step, Trace};
use serde::Serialize;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// Result of feeding one tick to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cursor moved to the given step.
    Advanced(usize),
    /// Cursor was already on the last step; playback stopped.
    Finished,
    /// Player was not playing; nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Player {
    trace: Trace,
    cursor: usize,
    state: PlaybackState,
}

impl Player {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            cursor: 0,
            state: PlaybackState::Idle,
        }
    }

    /// Replace the trace and rewind.
    pub fn load(&mut self, trace: Trace) {
        self.trace = trace;
        self.reset();
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// The step under the cursor.
    pub fn current(&self) -> Option<&Step> {
        self.trace.get(self.cursor)
    }

    pub fn at_end(&self) -> bool {
        self.cursor + 1 >= self.trace.len()
    }

    /// Start playing. No-op on an empty trace.
    pub fn play(&mut self) {
        if !self.trace.is_empty() {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance the cursor by one step while playing.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Ignored;
        }
        if self.at_end() {
            self.state = PlaybackState::Paused;
            return TickOutcome::Finished;
        }
        self.cursor += 1;
        TickOutcome::Advanced(self.cursor)
    }

    /// Jump to `index`, clamped to the trace. Stops playback.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.trace.len().saturating_sub(1));
        self.pause();
    }

    pub fn next(&mut self) {
        self.seek(self.cursor.saturating_add(1));
    }

    pub fn prev(&mut self) {
        self.seek(self.cursor.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.state = PlaybackState::Idle;
    }
}
