// Timer-based input coalescing.
// Collapses bursts of events into one value delivered after a quiet period.

use std::time::{Duration, Instant};

/// Holds the latest pushed value until no new value has arrived for `delay`.
///
/// Each push replaces the pending value and restarts the timer. The owner polls
/// with the current time; nothing runs in the background.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new event, cancelling any pending one.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Time left before the pending value is ready, if there is one.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
