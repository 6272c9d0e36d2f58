//! Read-only axis state for monitor consumers

use crate::angle::Millideg;
use crate::calibration::CalStatus;
use crate::safety::Fault;
use crate::traits::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapshot of one axis, published once per control tick
///
/// Everything a UART monitor or display needs; mutating control state
/// stays inside the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RotorSnapshot {
    /// Axis id from the configuration
    pub id: u8,
    /// Measured position, normalized millidegrees
    pub position: Millideg,
    /// Commanded target on the continuous scale
    pub target: Millideg,
    /// Signed shortest error toward the target
    pub error: Millideg,
    /// Drive magnitude currently commanded, percent
    pub pwm: u8,
    /// Logical drive direction
    pub dir: Direction,
    /// Calibration progress
    pub cal_status: CalStatus,
    /// Axis has a valid position reference
    pub calibrated: bool,
    /// End-stop sensor levels
    pub at_end1: bool,
    pub at_end2: bool,
    /// Completed full revolutions
    pub rounds: i32,
    /// Held fault, if any
    pub fault: Option<Fault>,
}
