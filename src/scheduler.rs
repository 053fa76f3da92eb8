//! Single-owner tick timer
//!
//! The play loop calls [`TickScheduler::sync`] once per iteration with the
//! engine's current interval. The timer is rebuilt only when that interval
//! changes and dropped while the run is not advancing.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::trace;

/// Shortest period the timer accepts
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
pub struct TickScheduler {
    timer: Option<Interval>,
    period: Option<Duration>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install, restart or cancel the timer to match the engine. A zero period
    /// is raised to [`MIN_PERIOD`].
    pub fn sync(&mut self, period: Duration, running: bool) {
        if !running {
            self.cancel();
            return;
        }

        let period = period.max(MIN_PERIOD);

        if self.timer.is_some() && self.period == Some(period) {
            return;
        }

        // First tick lands one full period out, not immediately.
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        trace!(period_ms = period.as_millis() as u64, "tick timer installed");
        self.timer = Some(timer);
        self.period = Some(period);
    }

    pub fn cancel(&mut self) {
        if self.timer.take().is_some() {
            trace!("tick timer cancelled");
        }
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Wait for the next tick. Never resolves while no timer is installed.
    pub async fn next_tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
