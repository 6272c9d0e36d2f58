//! Fault taxonomy and stall supervision

mod monitor;

pub use monitor::StallMonitor;

use crate::calibration::CalFault;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Recoverable per-axis faults
///
/// A faulted axis stops commanding motion but keeps reporting; it
/// resumes after an external fault clear or a forced recalibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fault {
    /// Calibration run failed
    Calibration(CalFault),
    /// Commanded motion produced no position change
    Stall,
}
