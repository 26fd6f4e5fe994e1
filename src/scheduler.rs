//! Deadline scheduler for the widget's three timers.
//!
//! The clock and the snippet cycle are periodic; the keystroke timer is a
//! one-shot that the animator re-arms after every keystroke. The runtime
//! sleeps until [`Scheduler::next_deadline`] and then drains
//! [`Scheduler::pop_due`]. Dropping the scheduler cancels everything.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Clock,
    Keystroke,
    Cycle,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    clock_period: Duration,
    cycle_period: Duration,
    clock_due: Instant,
    cycle_due: Instant,
    keystroke_due: Option<Instant>,
}

impl Scheduler {
    /// Both periodic timers fire first one full period after `now`.
    pub fn new(clock_period: Duration, cycle_period: Duration, now: Instant) -> Self {
        Self {
            clock_period,
            cycle_period,
            clock_due: now + clock_period,
            cycle_due: now + cycle_period,
            keystroke_due: None,
        }
    }

    pub fn next_deadline(&self) -> Instant {
        let periodic = self.clock_due.min(self.cycle_due);
        match self.keystroke_due {
            Some(due) => due.min(periodic),
            None => periodic,
        }
    }

    /// Arm (or re-arm) the keystroke timer. `None` cancels it.
    pub fn schedule_keystroke(&mut self, now: Instant, delay: Option<Duration>) {
        self.keystroke_due = delay.map(|d| now + d);
    }

    pub fn keystroke_pending(&self) -> bool {
        self.keystroke_due.is_some()
    }

    /// Take the next timer that is due at `now`, re-arming periodic ones.
    ///
    /// A periodic timer that fell behind fires once and skips the missed
    /// periods rather than bursting.
    pub fn pop_due(&mut self, now: Instant) -> Option<Tick> {
        if self.clock_due <= now {
            self.clock_due = next_after(self.clock_due, self.clock_period, now);
            return Some(Tick::Clock);
        }
        if self.keystroke_due.is_some_and(|due| due <= now) {
            self.keystroke_due = None;
            return Some(Tick::Keystroke);
        }
        if self.cycle_due <= now {
            self.cycle_due = next_after(self.cycle_due, self.cycle_period, now);
            return Some(Tick::Cycle);
        }
        None
    }
}

fn next_after(mut due: Instant, period: Duration, now: Instant) -> Instant {
    if period.is_zero() {
        return now + Duration::from_millis(1);
    }
    while due <= now {
        due += period;
    }
    due
}
