//! Time source and the token that schedules the Thinking -> Revealed transition.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for scheduling the delayed reveal.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A pending reveal. Only honoured while its generation is still the
/// session's current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    generation: u64,
    deadline: Instant,
}

impl RevealTicket {
    pub(crate) fn new(generation: u64, deadline: Instant) -> Self {
        Self {
            generation,
            deadline,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left before the ticket is due, zero once it is.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let before = clock.now();
        other.advance(Duration::from_millis(500));
        assert_eq!(clock.now() - before, Duration::from_millis(500));
    }

    #[test]
    fn test_ticket_due_at_deadline() {
        let clock = ManualClock::new();
        let ticket = RevealTicket::new(1, clock.now() + Duration::from_secs(2));
        assert!(!ticket.is_due(clock.now()));
        assert_eq!(ticket.remaining(clock.now()), Duration::from_secs(2));

        clock.advance(Duration::from_secs(2));
        assert!(ticket.is_due(clock.now()));
        assert_eq!(ticket.remaining(clock.now()), Duration::ZERO);
    }
}
