//! Trailing-edge save debouncer driven by host-supplied instants.
//!
//! # Invariants
//! - Every `schedule` pushes the deadline to `now + window`.
//! - `poll` fires at most once per burst of schedules.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl SaveDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records a mutation at `now`, superseding any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending save is due, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline (after an explicit save).
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
