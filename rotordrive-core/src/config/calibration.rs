//! Calibration parameters for one axis

use crate::angle::Millideg;
use crate::traits::Direction;

/// Which end-stop sensor terminates the calibration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndStop {
    #[default]
    End1,
    End2,
}

/// Calibration run parameters
///
/// `fine_speed == 0` selects single-phase calibration: the first end-stop
/// contact is final. A nonzero `fine_speed` enables the two-phase run:
/// after first contact the axis backs off `backoff_pulses` and
/// re-approaches slowly for a repeatable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalConfig {
    /// Drive magnitude toward the end stop, percent
    pub seek_speed: u8,
    /// Drive magnitude for the second, slow approach; 0 disables it
    pub fine_speed: u8,
    /// Back-off distance between the two approaches, in pulses
    pub backoff_pulses: u16,
    /// End stop the run drives into
    pub target: EndStop,
    /// Direction that moves toward the end stop
    pub direction: Direction,
    /// Pulses from the end stop to the reference position; positive
    /// means the end stop sits below the reference
    pub offset_pulses: i32,
    /// Angle the axis reads at the reference position
    pub reference: Millideg,
    /// Ticks without any pulse before the run faults (stalled motor)
    pub pulse_budget_ticks: u32,
    /// Ticks without end-stop contact before the run faults
    pub endstop_budget_ticks: u32,
}

impl Default for CalConfig {
    fn default() -> Self {
        Self {
            seek_speed: 100,
            fine_speed: 0,
            backoff_pulses: 20,
            target: EndStop::End1,
            direction: Direction::CounterClockwise,
            offset_pulses: 10,
            reference: 0,
            pulse_budget_ticks: 100,
            endstop_budget_ticks: 36_000,
        }
    }
}
