//! Pending-timer resource for debounced writes
//!
//! A [`Debouncer`] holds at most one deadline. Scheduling again replaces the
//! deadline, so a burst of triggers collapses into one firing after the quiet
//! period. Nothing runs by itself: the owner polls [`Debouncer::fire_if_due`]
//! (or sleeps until [`Debouncer::deadline`]) and performs the effect.

use std::time::Duration;
use tokio::time::Instant;

/// Quiet period before a snapshot save
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Quiet period applied to pure position churn before it requests a save
pub const TIME_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Last-write-wins single deadline
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm relative to `now`, replacing any pending deadline
    pub fn schedule_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// (Re)arm relative to the current instant
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// Pending deadline, if armed
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a firing is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop the pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Disarm and return `true` if the deadline has passed at `now`
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let mut debouncer = Debouncer::new(SAVE_DEBOUNCE);
        debouncer.schedule();

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!debouncer.fire_if_due(Instant::now()));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(debouncer.fire_if_due(Instant::now()));
        assert!(!debouncer.fire_if_due(Instant::now()));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_pushes_deadline_back() {
        let mut debouncer = Debouncer::new(SAVE_DEBOUNCE);
        debouncer.schedule();

        for _ in 0..5 {
            tokio::time::advance(Duration::from_millis(600)).await;
            debouncer.schedule();
            assert!(!debouncer.fire_if_due(Instant::now()));
        }

        tokio::time::advance(SAVE_DEBOUNCE).await;
        assert!(debouncer.fire_if_due(Instant::now()));
    }

    #[test]
    fn cancel_disarms() {
        let mut debouncer = Debouncer::new(TIME_DEBOUNCE);
        let now = Instant::now();
        debouncer.schedule_at(now);
        assert_eq!(debouncer.deadline(), Some(now + TIME_DEBOUNCE));

        debouncer.cancel();
        assert!(!debouncer.fire_if_due(now + TIME_DEBOUNCE * 2));
    }
}
