//! Periodic tick source for playback.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// One tick, tagged with the generation of the ticker that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// A running timer task that sends a [`Tick`] every `period`.
///
/// The first tick fires one full period after start. The task is aborted when
/// the `Ticker` is dropped, so holding a `Ticker` is holding the timer.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
    generation: u64,
    period: Duration,
}

impl Ticker {
    /// Spawn the timer task on the current tokio runtime.
    ///
    /// A zero `period` is raised to one millisecond; `interval_at` rejects it.
    pub fn start(period: Duration, generation: u64, tx: mpsc::Sender<Tick>) -> Self {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).await.is_err() {
                    break;
                }
            }
        });

        tracing::trace!(generation, ?period, "ticker started");
        Self {
            handle,
            generation,
            period,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::trace!(generation = self.generation, "ticker released");
    }
}
