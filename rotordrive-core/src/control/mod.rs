//! Per-axis control loop and dual-axis goto coordination

mod coordinator;
mod rotor;

pub use coordinator::{Coordinator, GotoValue};
pub use rotor::{MotorCommand, Rotor, TickInput, TickOutput};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which axis of the pair a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Azimuth (or X) axis
    Azimuth,
    /// Elevation (or Y) axis
    Elevation,
}
