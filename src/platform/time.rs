//! Fixed-step pacing
//!
//! The simulation always advances by whole ticks. [`FixedStep`] holds the
//! caller back until the next tick boundary, napping at most a millisecond
//! at a time, and never tries to catch up on ticks it fell behind on.

use std::time::{Duration, Instant};

/// Source of monotonic time
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

const MAX_NAP: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: Duration,
    next: Option<Instant>,
}

impl FixedStep {
    pub fn new(tick_seconds: f64) -> Self {
        let step = Duration::try_from_secs_f64(tick_seconds).unwrap_or_else(|err| {
            log::warn!("tick length {tick_seconds}s unusable ({err}), pacing at 100 Hz");
            Duration::from_millis(10)
        });
        Self { step, next: None }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Block until the current tick is due. The first call returns at once.
    pub fn wait(&mut self, clock: &impl Clock) {
        let now = clock.now();
        let due = *self.next.get_or_insert(now);
        let mut now = now;
        while now < due {
            clock.sleep((due - now).min(MAX_NAP));
            now = clock.now();
        }
        // More than a tick late: restart the schedule instead of bunching up
        let late = now - due;
        self.next = Some(if late > self.step {
            now + self.step
        } else {
            due + self.step
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Clock that only moves when slept on
    struct ManualClock {
        now: Cell<Instant>,
        naps: RefCell<Vec<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Cell::new(Instant::now()),
                naps: RefCell::new(Vec::new()),
            }
        }

        fn advance(&self, d: Duration) {
            self.now.set(self.now.get() + d);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.now.get()
        }

        fn sleep(&self, duration: Duration) {
            self.naps.borrow_mut().push(duration);
            self.advance(duration);
        }
    }

    #[test]
    fn test_first_wait_is_immediate() {
        let clock = ManualClock::new();
        let mut pacer = FixedStep::new(0.01);
        pacer.wait(&clock);
        assert!(clock.naps.borrow().is_empty());
    }

    #[test]
    fn test_waits_out_the_tick_in_short_naps() {
        let clock = ManualClock::new();
        let start = clock.now();
        let mut pacer = FixedStep::new(0.01);
        pacer.wait(&clock);
        pacer.wait(&clock);
        assert_eq!(clock.now() - start, Duration::from_millis(10));
        let naps = clock.naps.borrow();
        assert_eq!(naps.len(), 10);
        assert!(naps.iter().all(|&d| d <= MAX_NAP));
    }

    #[test]
    fn test_work_time_counts_toward_the_tick() {
        let clock = ManualClock::new();
        let start = clock.now();
        let mut pacer = FixedStep::new(0.01);
        pacer.wait(&clock);
        clock.advance(Duration::from_millis(7));
        pacer.wait(&clock);
        assert_eq!(clock.now() - start, Duration::from_millis(10));
    }

    #[test]
    fn test_unusable_tick_length_falls_back() {
        assert_eq!(FixedStep::new(1e300).step(), Duration::from_millis(10));
        assert_eq!(FixedStep::new(-1.0).step(), Duration::from_millis(10));
        assert_eq!(FixedStep::new(0.02).step(), Duration::from_millis(20));
    }

    #[test]
    fn test_late_tick_does_not_bunch_up() {
        let clock = ManualClock::new();
        let mut pacer = FixedStep::new(0.01);
        pacer.wait(&clock);
        clock.advance(Duration::from_millis(35));
        pacer.wait(&clock);
        let late = clock.now();
        pacer.wait(&clock);
        assert_eq!(clock.now() - late, Duration::from_millis(10));
    }
}
