//! Search-as-you-type debouncing.
//!
//! Each keystroke restarts the quiet period; the query is sent once the
//! user has stopped typing for the configured delay. Callers pass the
//! current time in, which keeps this usable from any event loop.

use std::time::{Duration, Instant};

/// Default quiet period (100ms).
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    /// Time of the last unsent edit.
    last_change: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_change: None,
        }
    }

    /// Record a query edit.
    pub fn touch(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    /// Drop a pending edit without firing.
    pub fn cancel(&mut self) {
        self.last_change = None;
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    /// Returns true exactly once per quiet period, when the search should
    /// be sent.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_change {
            Some(last) if now.duration_since(last) >= self.delay => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before [`poll`](Self::poll) fires, if an edit is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|last| self.delay.saturating_sub(now.duration_since(last)))
    }
}
