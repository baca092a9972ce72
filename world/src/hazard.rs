//! Fixed-period toggle that makes hazard ground impassable.

use std::time::Duration;

use maze_rescue_core::Countdown;

/// Alternates between a safe window and an active window.
///
/// Each cycle starts safe. Overshoot from one window carries into the next,
/// so the active flag at any accumulated time `t` equals
/// `t % (safe + active) >= safe`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HazardCycle {
    safe: Duration,
    active: Duration,
    window: Countdown,
    active_now: bool,
    enabled: bool,
}

impl HazardCycle {
    /// Creates a cycle with the provided window lengths.
    ///
    /// A cycle with a zero-length window, or one created disabled, never
    /// becomes active.
    #[must_use]
    pub fn new(safe: Duration, active: Duration, enabled: bool) -> Self {
        Self {
            safe,
            active,
            window: Countdown::new(safe),
            active_now: false,
            enabled: enabled && !safe.is_zero() && !active.is_zero(),
        }
    }

    /// Reports whether hazard ground is currently impassable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active_now
    }

    /// Time left in the current window.
    #[must_use]
    pub const fn window_remaining(&self) -> Duration {
        self.window.remaining()
    }

    /// Advances the cycle, flipping windows as they expire.
    pub fn advance(&mut self, dt: Duration) {
        if !self.enabled {
            return;
        }

        let mut pending = dt;
        while let Some(overflow) = self.window.tick_with_overflow(pending) {
            self.active_now = !self.active_now;
            let next = if self.active_now {
                self.active
            } else {
                self.safe
            };
            self.window.restart(next);
            pending = overflow;
            if pending.is_zero() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_cycle_never_activates() {
        let mut cycle = HazardCycle::new(Duration::from_secs(1), Duration::from_secs(1), false);
        for _ in 0..50 {
            cycle.advance(Duration::from_millis(100));
            assert!(!cycle.is_active());
        }
    }

    #[test]
    fn zero_window_never_activates() {
        let mut cycle = HazardCycle::new(Duration::from_secs(1), Duration::ZERO, true);
        cycle.advance(Duration::from_secs(5));
        assert!(!cycle.is_active());
    }

    #[test]
    fn large_steps_carry_overflow_across_windows() {
        let safe = Duration::from_millis(300);
        let active = Duration::from_millis(200);
        let mut cycle = HazardCycle::new(safe, active, true);

        cycle.advance(Duration::from_millis(1_350));
        // 1350 % 500 = 350, inside the active window.
        assert!(cycle.is_active());
        assert_eq!(cycle.window_remaining(), Duration::from_millis(150));
    }
}
