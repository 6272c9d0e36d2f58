//! Pulse-count position feedback
//!
//! The interrupt side owns the live counter (incremented or decremented
//! per edge, depending on the direction flag settled at that edge); the
//! control tick hands a consistent snapshot to this type, which derives
//! the normalized position, completed revolutions and end-stop levels.

use crate::angle::{self, Millideg};
use crate::config::EndStop;

/// Per-axis position feedback state
#[derive(Debug, Clone)]
pub struct PulseFeedback {
    steps_per_rev: i32,
    reference: Millideg,
    rotated: i32,
    at_end1: bool,
    at_end2: bool,
}

impl PulseFeedback {
    /// Create feedback for an axis
    ///
    /// `reference` is the angle read when the counter is zero.
    pub fn new(steps_per_rev: i32, reference: Millideg) -> Self {
        Self {
            steps_per_rev,
            reference,
            rotated: 0,
            at_end1: false,
            at_end2: false,
        }
    }

    /// Take this tick's counter snapshot and end-stop levels
    pub fn update(&mut self, rotated: i32, at_end1: bool, at_end2: bool) {
        self.rotated = rotated;
        self.at_end1 = at_end1;
        self.at_end2 = at_end2;
    }

    /// Raw signed pulse count
    pub fn rotated(&self) -> i32 {
        self.rotated
    }

    /// Normalized position in `[0, FULL_TURN)`
    pub fn degrees(&self) -> Millideg {
        angle::normalize(self.extended_degrees())
    }

    /// Position on the continuous (unwrapped) scale
    ///
    /// Keeps the turn count, which branch selection needs for rotors
    /// that travel past 360.
    pub fn extended_degrees(&self) -> Millideg {
        angle::pulses_to_mdeg(self.rotated, self.steps_per_rev) + self.reference
    }

    /// Completed full revolutions (truncated toward zero)
    pub fn rounds(&self) -> i32 {
        self.rotated / self.steps_per_rev
    }

    /// Level of the given end-stop sensor
    pub fn at_end(&self, which: EndStop) -> bool {
        match which {
            EndStop::End1 => self.at_end1,
            EndStop::End2 => self.at_end2,
        }
    }

    /// Level of either end-stop sensor
    pub fn at_any_end(&self) -> bool {
        self.at_end1 || self.at_end2
    }

    /// Counter value that reads as the end-stop position
    ///
    /// A positive offset means the end stop sits below the reference, so
    /// the counter restarts negative.
    pub fn endstop_reset_value(offset_pulses: i32) -> i32 {
        -offset_pulses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::FULL_TURN;

    #[test]
    fn test_degrees_from_pulses() {
        let mut fb = PulseFeedback::new(1080, 0);
        fb.update(270, false, false);
        assert_eq!(fb.degrees(), 90_000);
        assert_eq!(fb.rounds(), 0);
    }

    #[test]
    fn test_negative_count_wraps() {
        let mut fb = PulseFeedback::new(1080, 0);
        fb.update(-270, false, false);
        assert_eq!(fb.degrees(), 270_000);
        assert_eq!(fb.extended_degrees(), -90_000);
    }

    #[test]
    fn test_reference_offset_applies() {
        let mut fb = PulseFeedback::new(1080, 90_000);
        fb.update(0, false, false);
        assert_eq!(fb.degrees(), 90_000);
    }

    #[test]
    fn test_rounds_counts_revolutions() {
        let mut fb = PulseFeedback::new(1080, 0);
        fb.update(1080 * 3 + 540, false, false);
        assert_eq!(fb.rounds(), 3);
        assert_eq!(fb.degrees(), 180_000);
        assert_eq!(fb.extended_degrees(), 3 * FULL_TURN + 180_000);
    }

    #[test]
    fn test_endstop_levels() {
        let mut fb = PulseFeedback::new(1080, 0);
        fb.update(0, true, false);
        assert!(fb.at_end(EndStop::End1));
        assert!(!fb.at_end(EndStop::End2));
        assert!(fb.at_any_end());
    }

    #[test]
    fn test_endstop_reset_value() {
        // Offset 10: end stop is 10 pulses below the reference.
        assert_eq!(PulseFeedback::endstop_reset_value(10), -10);
        let mut fb = PulseFeedback::new(1080, 0);
        fb.update(PulseFeedback::endstop_reset_value(10), false, false);
        assert_eq!(fb.extended_degrees(), -3_333);
    }
}
