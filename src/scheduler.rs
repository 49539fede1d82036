//! Mutation-driven rescan scheduling.
//!
//! The scheduler turns bursts of structural mutation into at most one scan
//! after a quiet period. It is a plain state machine over a cancelable
//! deadline: every qualifying mutation replaces any pending deadline
//! (last-write-wins, no queue), and `Disabled` is terminal once the
//! findings cap trips. The async driver that owns the timer lives in
//! [`crate::engine`].

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Debouncing,
    Disabled,
}

#[derive(Debug)]
pub struct Scheduler {
    state: SchedulerState,
    debounce: Duration,
    deadline: Option<Instant>,
}

impl Scheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SchedulerState::Idle,
            debounce,
            deadline: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Pending timer deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// (Re)start the debounce window, canceling any pending deadline.
    ///
    /// Returns false when the scheduler is already disabled; such requests
    /// are ignored.
    pub fn schedule(&mut self, now: Instant) -> bool {
        if self.state == SchedulerState::Disabled {
            return false;
        }
        self.state = SchedulerState::Debouncing;
        self.deadline = Some(now + self.debounce);
        true
    }

    /// Consume the pending deadline when the timer expires.
    pub fn fire(&mut self) {
        if self.state == SchedulerState::Debouncing {
            self.state = SchedulerState::Idle;
        }
        self.deadline = None;
    }

    /// Terminal transition: no scan is ever scheduled again.
    pub fn disable(&mut self) {
        self.state = SchedulerState::Disabled;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(600);

    #[tokio::test]
    async fn test_burst_coalesces_to_latest_deadline() {
        let mut s = Scheduler::new(DEBOUNCE);
        let start = Instant::now();
        assert!(s.schedule(start));
        for i in 1..10 {
            assert!(s.schedule(start + Duration::from_millis(i * 50)));
        }
        // The only pending deadline is the one for the last event.
        assert_eq!(s.deadline(), Some(start + Duration::from_millis(450) + DEBOUNCE));
        assert_eq!(s.state(), SchedulerState::Debouncing);
    }

    #[tokio::test]
    async fn test_fire_returns_to_idle() {
        let mut s = Scheduler::new(DEBOUNCE);
        s.schedule(Instant::now());
        s.fire();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert_eq!(s.deadline(), None);
    }

    #[tokio::test]
    async fn test_disabled_is_terminal() {
        let mut s = Scheduler::new(DEBOUNCE);
        s.disable();
        assert!(!s.schedule(Instant::now()));
        assert_eq!(s.deadline(), None);
        assert_eq!(s.state(), SchedulerState::Disabled);
    }
}
