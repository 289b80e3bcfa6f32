//! Fixed-interval reconnect scheduling.
//!
//! At most one retry timer exists at a time. Scheduling while a timer is live
//! is a no-op, and cancelling aborts the timer task outright, so a cancelled
//! policy cannot fire again. Every tick carries a [`ReconnectTicket`]; the
//! owner checks it with [`ReconnectPolicy::accepts`] to drop ticks that were
//! already queued when the timer was cancelled.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Identifies the timer that produced a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectTicket(u64);

/// Repeating retry timer with idempotent `schedule` and safe `cancel`.
#[derive(Debug, Default)]
pub struct ReconnectPolicy {
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

impl ReconnectPolicy {
    /// Nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` every `interval` until cancelled.
    ///
    /// The first run happens one full interval from now. Returns `false`
    /// without touching the existing timer if one is already scheduled.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, interval: Duration, mut action: F) -> bool
    where
        F: FnMut(ReconnectTicket) + Send + 'static,
    {
        if self.is_scheduled() {
            return false;
        }

        self.generation += 1;
        let ticket = ReconnectTicket(self.generation);
        let start = Instant::now() + interval;
        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                action(ticket);
            }
        }));
        true
    }

    /// Stop the timer if one is scheduled. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }

    /// Whether a timer is live.
    pub fn is_scheduled(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether `ticket` belongs to the timer that is currently scheduled.
    pub fn accepts(&self, ticket: ReconnectTicket) -> bool {
        self.is_scheduled() && ticket.0 == self.generation
    }
}

impl Drop for ReconnectPolicy {
    fn drop(&mut self) {
        self.cancel();
    }
}
