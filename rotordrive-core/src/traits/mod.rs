//! Hardware abstraction traits
//!
//! Driver implementations live in `rotordrive-drivers`; the control core
//! only emits commands against these interfaces.

mod motor;
mod stepper;

pub use motor::DcMotorDriver;
pub use stepper::StepperDriver;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation direction in the logical angle domain
///
/// `Clockwise` always means increasing degrees; per-axis wiring quirks
/// are handled by the direction-swap flag at the pin boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Increasing degrees
    #[default]
    Clockwise,
    /// Decreasing degrees
    CounterClockwise,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Direction that reduces a signed position error
    pub fn from_error(error: i32) -> Self {
        if error >= 0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_error() {
        assert_eq!(Direction::from_error(5_000), Direction::Clockwise);
        assert_eq!(Direction::from_error(0), Direction::Clockwise);
        assert_eq!(Direction::from_error(-5_000), Direction::CounterClockwise);
    }

    #[test]
    fn test_direction_sign_matches_opposite() {
        for dir in [Direction::Clockwise, Direction::CounterClockwise] {
            assert_eq!(dir.sign(), -dir.opposite().sign());
        }
    }
}
