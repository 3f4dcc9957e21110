//! Simulation-time timers
//!
//! Both timers advance only when the tick hands them `dt`, so they stay
//! deterministic and never block the frame loop.

use serde::{Deserialize, Serialize};

/// Looping timer that fires every `period` seconds while not paused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatingTimer {
    period: f32,
    elapsed: f32,
    paused: bool,
}

impl RepeatingTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            paused: false,
        }
    }

    /// Advance by `dt`, returning how many times the timer fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.paused || self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds until the next firing (ignores pause)
    pub fn remaining(&self) -> f32 {
        self.period - self.elapsed
    }

    /// Back to a fresh, running cycle
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.paused = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum DelayState {
    Pending,
    Fired,
    Cancelled,
}

/// One-shot deferred callback: fires exactly once unless cancelled first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    remaining: f32,
    state: DelayState,
}

impl Delay {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds,
            state: DelayState::Pending,
        }
    }

    /// Advance by `dt`; true on the single tick the delay elapses
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state != DelayState::Pending {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.state = DelayState::Fired;
            return true;
        }
        false
    }

    /// Cancel a pending delay. No effect once fired.
    pub fn cancel(&mut self) {
        if self.state == DelayState::Pending {
            self.state = DelayState::Cancelled;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == DelayState::Pending
    }

    pub fn has_fired(&self) -> bool {
        self.state == DelayState::Fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_timer_fires_each_period() {
        let mut timer = RepeatingTimer::new(0.5);
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
        assert_eq!(timer.advance(1.0), 2);
    }

    #[test]
    fn test_paused_timer_holds_progress() {
        let mut timer = RepeatingTimer::new(1.0);
        timer.advance(0.75);
        timer.pause();
        assert_eq!(timer.advance(10.0), 0);
        timer.resume();
        assert_eq!(timer.advance(0.25), 1);
    }

    #[test]
    fn test_delay_fires_once() {
        let mut delay = Delay::new(0.5);
        assert!(!delay.advance(0.25));
        assert!(delay.advance(0.25));
        assert!(delay.has_fired());
        assert!(!delay.advance(1.0));
    }

    #[test]
    fn test_cancelled_delay_never_fires() {
        let mut delay = Delay::new(0.5);
        delay.cancel();
        assert!(!delay.is_pending());
        assert!(!delay.advance(1.0));
        assert!(!delay.has_fired());
    }
}
