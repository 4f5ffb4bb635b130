//! Debounce state machine.
//!
//! Watch mode coalesces bursts of filesystem events into a single rebuild:
//! the first relevant event arms a timer, further events reset it, and the
//! build fires only once the stream has been quiet for the whole window.
//!
//! The machine is clock-injected (callers pass `Instant`s), so transitions
//! are unit-testable without sleeping.

use std::time::{Duration, Instant};

/// Watch loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Nothing pending.
    Idle,
    /// A debounce timer is armed.
    PendingBuild,
    /// A build is in flight.
    Building,
}

/// Coalesces events into at most one pending build.
#[derive(Debug)]
pub struct Debouncer {
    state: WatchState,
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            state: WatchState::Idle,
            window,
            deadline: None,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Record a relevant filesystem event, arming or resetting the timer.
    ///
    /// Ignored while a build is in flight: the synchronous build call has
    /// not returned yet and events raced against it are dropped.
    pub fn note_event(&mut self, now: Instant) {
        if self.state == WatchState::Building {
            return;
        }
        self.state = WatchState::PendingBuild;
        self.deadline = Some(now + self.window);
    }

    /// Check whether the armed timer has expired. On expiry the machine
    /// moves to `Building` and the caller must invoke the build, then call
    /// [`build_finished`](Self::build_finished).
    pub fn fire(&mut self, now: Instant) -> bool {
        match (self.state, self.deadline) {
            (WatchState::PendingBuild, Some(deadline)) if now >= deadline => {
                self.state = WatchState::Building;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// A build completed (success or failure); return to idle.
    pub fn build_finished(&mut self) {
        self.state = WatchState::Idle;
    }

    /// Time remaining until the armed deadline, if any.
    pub fn time_until_deadline(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(now))
            .filter(|_| self.state == WatchState::PendingBuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn starts_idle() {
        let debouncer = Debouncer::new(WINDOW);
        assert_eq!(debouncer.state(), WatchState::Idle);
        assert!(debouncer.time_until_deadline(Instant::now()).is_none());
    }

    #[test]
    fn event_arms_timer() {
        let mut debouncer = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.note_event(t0);
        assert_eq!(debouncer.state(), WatchState::PendingBuild);
        assert_eq!(debouncer.time_until_deadline(t0), Some(WINDOW));
    }

    #[test]
    fn burst_coalesces_into_one_fire() {
        let mut debouncer = Debouncer::new(WINDOW);
        let t0 = Instant::now();

        // Five rapid events within 100ms.
        for i in 0..5 {
            let t = t0 + Duration::from_millis(i * 20);
            debouncer.note_event(t);
            assert!(!debouncer.fire(t));
        }

        // Timer expired relative to the *last* event.
        let last = t0 + Duration::from_millis(80);
        assert!(!debouncer.fire(last + WINDOW - Duration::from_millis(1)));
        assert!(debouncer.fire(last + WINDOW));
        assert_eq!(debouncer.state(), WatchState::Building);

        // Only one fire per burst.
        assert!(!debouncer.fire(last + WINDOW * 2));

        debouncer.build_finished();
        assert_eq!(debouncer.state(), WatchState::Idle);
    }

    #[test]
    fn spaced_events_fire_separately() {
        let mut debouncer = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        let mut fires = 0;

        for i in 0..3u32 {
            let t = t0 + (WINDOW * 3) * i;
            debouncer.note_event(t);
            assert!(debouncer.fire(t + WINDOW));
            fires += 1;
            debouncer.build_finished();
        }

        assert_eq!(fires, 3);
    }

    #[test]
    fn event_resets_armed_timer() {
        let mut debouncer = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.note_event(t0);

        let t1 = t0 + Duration::from_millis(400);
        debouncer.note_event(t1);

        // Original deadline has passed but was reset by the second event.
        assert!(!debouncer.fire(t0 + WINDOW));
        assert!(debouncer.fire(t1 + WINDOW));
    }

    #[test]
    fn events_during_build_are_dropped() {
        let mut debouncer = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        debouncer.note_event(t0);
        assert!(debouncer.fire(t0 + WINDOW));

        debouncer.note_event(t0 + WINDOW + Duration::from_millis(10));
        assert_eq!(debouncer.state(), WatchState::Building);

        debouncer.build_finished();
        assert_eq!(debouncer.state(), WatchState::Idle);
        assert!(!debouncer.fire(t0 + WINDOW * 10));
    }

    #[test]
    fn fire_without_event_is_a_noop() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.fire(Instant::now() + WINDOW * 4));
        assert_eq!(debouncer.state(), WatchState::Idle);
    }
}
