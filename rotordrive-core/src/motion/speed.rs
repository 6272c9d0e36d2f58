//! Error-distance speed profile
//!
//! Maps the magnitude of the position error onto a drive percentage:
//! a stop band around the target (prevents dithering at rest), a
//! minimum-speed plateau, a linear ramp, and a maximum-speed plateau.

use crate::angle::Millideg;
use crate::config::SpeedConfig;
use crate::traits::Direction;

/// Drive magnitude and direction for one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveCommand {
    /// Drive magnitude in percent, 0 = stopped
    pub pwm: u8,
    /// Logical direction that reduces the error
    pub dir: Direction,
}

impl DriveCommand {
    /// A stopped drive
    pub const fn stopped() -> Self {
        Self {
            pwm: 0,
            dir: Direction::Clockwise,
        }
    }
}

/// Piecewise error-to-speed map for one axis
#[derive(Debug, Clone)]
pub struct SpeedProfile {
    cfg: SpeedConfig,
}

impl SpeedProfile {
    pub fn new(cfg: SpeedConfig) -> Self {
        Self { cfg }
    }

    /// Ramp slope in percent per degree, scaled by 1000
    pub fn d2v_slope_x1000(&self) -> i32 {
        let span = (self.cfg.max_speed - self.cfg.min_speed) as i64;
        let ramp = (self.cfg.max_speed_above - self.cfg.min_speed_below) as i64;
        (span * 1_000_000 / ramp) as i32
    }

    /// Drive magnitude for an absolute error distance
    pub fn pwm_for(&self, distance: Millideg) -> u8 {
        let c = &self.cfg;
        if distance <= c.stop_within {
            0
        } else if distance <= c.min_speed_below {
            c.min_speed
        } else if distance >= c.max_speed_above {
            c.max_speed
        } else {
            let span = (c.max_speed - c.min_speed) as i64;
            let ramp = (c.max_speed_above - c.min_speed_below) as i64;
            let above = (distance - c.min_speed_below) as i64;
            c.min_speed + (above * span / ramp) as u8
        }
    }

    /// Full drive command for a signed position error
    pub fn command(&self, error: Millideg) -> DriveCommand {
        DriveCommand {
            pwm: self.pwm_for(error.abs()),
            dir: Direction::from_error(error),
        }
    }
}
