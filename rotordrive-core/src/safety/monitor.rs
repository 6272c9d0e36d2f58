//! Stall supervision
//!
//! Counts consecutive control ticks in which the axis commands motion
//! but the measured position does not change. End-stop contact is not a
//! stall: the motor is expected to be blocked there.

/// Per-axis stall detector
#[derive(Debug, Clone)]
pub struct StallMonitor {
    threshold: u16,
    stuck_ticks: u16,
}

impl StallMonitor {
    /// Create a monitor that trips after `threshold` motionless ticks
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            stuck_ticks: 0,
        }
    }

    /// Feed one control tick; returns true when the stall trips
    pub fn update(&mut self, pwm: u8, moved: bool, at_end: bool) -> bool {
        if pwm == 0 || moved || at_end {
            self.stuck_ticks = 0;
            return false;
        }
        self.stuck_ticks = self.stuck_ticks.saturating_add(1);
        self.stuck_ticks >= self.threshold
    }

    /// Clear the motionless-tick counter
    pub fn reset(&mut self) {
        self.stuck_ticks = 0;
    }

    /// Ticks the axis has currently been commanded but motionless
    pub fn stuck_ticks(&self) -> u16 {
        self.stuck_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_after_threshold() {
        let mut m = StallMonitor::new(3);
        assert!(!m.update(50, false, false));
        assert!(!m.update(50, false, false));
        assert!(m.update(50, false, false));
    }

    #[test]
    fn test_motion_resets_counter() {
        let mut m = StallMonitor::new(3);
        m.update(50, false, false);
        m.update(50, false, false);
        assert!(!m.update(50, true, false));
        assert!(!m.update(50, false, false));
        assert_eq!(m.stuck_ticks(), 1);
    }

    #[test]
    fn test_no_trip_while_stopped_or_at_end() {
        let mut m = StallMonitor::new(2);
        for _ in 0..10 {
            assert!(!m.update(0, false, false));
            assert!(!m.update(80, false, true));
        }
    }
}
