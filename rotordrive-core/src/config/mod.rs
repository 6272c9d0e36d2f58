//! Configuration types and startup validation
//!
//! The firmware assembles one [`SystemConfig`] from board constants at
//! boot and validates it before any task starts. Validation failures are
//! fatal: a rotor with a broken configuration must not move.

mod calibration;
mod types;

pub use calibration::{CalConfig, EndStop};
pub use types::{MotorKind, PinAssignment, RotorKind, SpeedConfig, Span};

use crate::angle::AzimuthRange;

/// Full configuration of one rotor axis
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    /// Display name ("azi", "ele", "X", "Y")
    pub name: &'static str,
    /// Stable axis id, reported in telemetry
    pub id: u8,
    /// Feedback pulses per full revolution
    pub steps_per_rev: i32,
    /// Speed profile parameters
    pub speed: SpeedConfig,
    /// Calibration parameters
    pub cal: CalConfig,
    /// Flip the direction outputs at the pin boundary
    pub swap_dir: bool,
    /// Motor drive fitted to this axis
    pub motor: MotorKind,
    /// Pin bindings
    pub pins: PinAssignment,
    /// Ticks of commanded motion without position change before a
    /// stall fault is raised
    pub stall_ticks: u16,
}

/// Configuration of the two-axis system
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    pub kind: RotorKind,
    /// Azimuth (or X) axis
    pub azimuth: AxisConfig,
    /// Elevation (or Y) axis
    pub elevation: AxisConfig,
    /// Commandable azimuth range; `(max, min)` through north is forbidden
    pub azimuth_range: AzimuthRange,
    /// Valid elevation span, if the axis is limited
    pub elevation_span: Option<Span>,
    /// Tracker east/west pass info is meaningful for this mount
    pub use_east_west: bool,
    /// Azimuth rotor covers the full circle (or more) without a
    /// forbidden zone
    pub full_range_azimuth: bool,
}

/// Which pin function a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    Pulse,
    Pwm,
    Dir,
    EndStop,
}

/// Fatal configuration errors detected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Full-range azimuth and east/west pass info are mutually exclusive
    ConflictingAzimuthModes,
    /// A pin required by the configured motor or calibration is unset
    MissingPin { axis: u8, function: PinFunction },
    /// min_speed..max_speed is empty or exceeds 100
    InvalidSpeedRange { axis: u8 },
    /// Speed profile breakpoints are not ordered
    /// stop_within < min_speed_below < max_speed_above
    InvalidSpeedBreakpoints { axis: u8 },
    /// steps_per_rev must be positive
    InvalidStepsPerRev { axis: u8 },
}

impl SystemConfig {
    /// Validate the configuration; any error here halts startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.use_east_west && self.full_range_azimuth {
            return Err(ConfigError::ConflictingAzimuthModes);
        }
        self.azimuth.validate()?;
        self.elevation.validate()
    }
}

impl AxisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.steps_per_rev <= 0 {
            return Err(ConfigError::InvalidStepsPerRev { axis: self.id });
        }
        let s = &self.speed;
        if s.min_speed > s.max_speed || s.max_speed > 100 {
            return Err(ConfigError::InvalidSpeedRange { axis: self.id });
        }
        if s.stop_within < 0
            || s.stop_within >= s.min_speed_below
            || s.min_speed_below >= s.max_speed_above
        {
            return Err(ConfigError::InvalidSpeedBreakpoints { axis: self.id });
        }

        // Stepper axes have no feedback encoder; every DC drive needs
        // its pulse input and direction output.
        match self.motor {
            MotorKind::DcPwm { .. } => {
                if self.pins.pulse.is_none() {
                    return Err(ConfigError::MissingPin {
                        axis: self.id,
                        function: PinFunction::Pulse,
                    });
                }
                if self.pins.pwm.is_none() {
                    return Err(ConfigError::MissingPin {
                        axis: self.id,
                        function: PinFunction::Pwm,
                    });
                }
                if self.pins.dir.is_none() {
                    return Err(ConfigError::MissingPin {
                        axis: self.id,
                        function: PinFunction::Dir,
                    });
                }
            }
            MotorKind::DcFixed { .. } => {
                if self.pins.pulse.is_none() {
                    return Err(ConfigError::MissingPin {
                        axis: self.id,
                        function: PinFunction::Pulse,
                    });
                }
                if self.pins.dir.is_none() {
                    return Err(ConfigError::MissingPin {
                        axis: self.id,
                        function: PinFunction::Dir,
                    });
                }
            }
            MotorKind::Stepper { .. } => {}
        }

        let end_pin = match self.cal.target {
            EndStop::End1 => self.pins.end1,
            EndStop::End2 => self.pins.end2,
        };
        if end_pin.is_none() {
            return Err(ConfigError::MissingPin {
                axis: self.id,
                function: PinFunction::EndStop,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::AzimuthRange;

    fn axis(id: u8) -> AxisConfig {
        AxisConfig {
            name: "azi",
            id,
            steps_per_rev: 1080,
            speed: SpeedConfig::default(),
            cal: CalConfig::default(),
            swap_dir: false,
            motor: MotorKind::DcPwm { max_duty: 255 },
            pins: PinAssignment {
                pulse: Some(2),
                dir: Some(4),
                dir_inv: Some(5),
                low_speed: None,
                pwm: Some(10),
                end1: Some(3),
                end2: None,
            },
            stall_ticks: 50,
        }
    }

    fn system() -> SystemConfig {
        SystemConfig {
            kind: RotorKind::AzimuthElevation,
            azimuth: axis(2),
            elevation: axis(1),
            azimuth_range: AzimuthRange {
                min: 340_000,
                max: 200_000,
            },
            elevation_span: Some(Span {
                min: 0,
                max: 180_000,
            }),
            use_east_west: true,
            full_range_azimuth: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(system().validate(), Ok(()));
    }

    #[test]
    fn test_conflicting_azimuth_modes_rejected() {
        let mut cfg = system();
        cfg.full_range_azimuth = true;
        assert_eq!(cfg.validate(), Err(ConfigError::ConflictingAzimuthModes));
    }

    #[test]
    fn test_missing_pwm_pin_rejected() {
        let mut cfg = system();
        cfg.azimuth.pins.pwm = None;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingPin {
                axis: 2,
                function: PinFunction::Pwm,
            })
        );
    }

    #[test]
    fn test_missing_calibration_endstop_rejected() {
        let mut cfg = system();
        cfg.elevation.pins.end1 = None;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MissingPin {
                axis: 1,
                function: PinFunction::EndStop,
            })
        );
    }

    #[test]
    fn test_bad_speed_range_rejected() {
        let mut cfg = system();
        cfg.azimuth.speed.min_speed = 80;
        cfg.azimuth.speed.max_speed = 60;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidSpeedRange { axis: 2 })
        );
    }

    #[test]
    fn test_bad_breakpoints_rejected() {
        let mut cfg = system();
        cfg.elevation.speed.min_speed_below = 20_000;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidSpeedBreakpoints { axis: 1 })
        );
    }

    #[test]
    fn test_stepper_needs_no_pwm_pin() {
        let mut cfg = system();
        cfg.azimuth.motor = MotorKind::Stepper {
            max_speed: 100,
            max_accel: 50,
        };
        cfg.azimuth.pins.pwm = None;
        assert_eq!(cfg.validate(), Ok(()));
    }
}
