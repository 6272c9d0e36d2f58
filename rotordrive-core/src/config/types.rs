//! Per-axis configuration type definitions
//!
//! Configuration is assembled once at startup from board constants and
//! stays immutable; every control component receives it at construction.

use crate::angle::Millideg;

/// What the two axes of the rotor pair mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotorKind {
    /// Azimuth/elevation mount - azimuth wraps, east/west semantics apply
    #[default]
    AzimuthElevation,
    /// Crossed X/Y mount - neither axis wraps
    Xy,
}

/// Motor drive fitted to an axis
///
/// A closed set, selected once at startup; the controller branches on
/// this, never on opaque driver handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorKind {
    /// Fixed-speed DC drive; below `low_speed_below` percent the
    /// low-speed output is asserted instead of scaling a duty cycle
    DcFixed { low_speed_below: u8 },
    /// PWM-speed DC drive; `max_duty` is the counter value at 100%
    /// (kept under full scale for controllers that need visible pulses)
    DcPwm { max_duty: u8 },
    /// Stepper drive; ramping is delegated to the driver, the core
    /// only commands target position within these limits
    Stepper { max_speed: u16, max_accel: u16 },
}

/// Pin identifiers for one axis; `None` marks an unconnected function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Pulse feedback input (interrupt capable)
    pub pulse: Option<u8>,
    /// Direction output
    pub dir: Option<u8>,
    /// Inverted direction output
    pub dir_inv: Option<u8>,
    /// Low-speed indication output (fixed-speed drives)
    pub low_speed: Option<u8>,
    /// PWM speed output
    pub pwm: Option<u8>,
    /// End-stop inputs
    pub end1: Option<u8>,
    pub end2: Option<u8>,
}

/// Error-distance to drive-magnitude mapping parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedConfig {
    /// Lowest drive magnitude the motor still moves at, percent
    pub min_speed: u8,
    /// Full drive magnitude, percent
    pub max_speed: u8,
    /// At or above this error distance the profile commands max speed
    pub max_speed_above: Millideg,
    /// At or below this error distance the profile commands min speed
    pub min_speed_below: Millideg,
    /// Within this error distance the rotor is considered on target
    pub stop_within: Millideg,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            min_speed: 50,
            max_speed: 100,
            max_speed_above: 10_000,
            min_speed_below: 2_000,
            stop_within: 200,
        }
    }
}

/// Valid span for a non-wrapping axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Span {
    pub min: Millideg,
    pub max: Millideg,
}

impl Span {
    /// Clamp a value into the span, reporting whether it was outside
    pub fn clamp(&self, value: Millideg) -> (Millideg, bool) {
        let clamped = value.clamp(self.min, self.max);
        (clamped, clamped != value)
    }
}
