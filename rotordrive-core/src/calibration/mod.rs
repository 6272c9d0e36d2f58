//! End-stop calibration state machine
//!
//! Drives an axis of unknown position into its end stop to establish the
//! pulse-counter reference. The run confirms the motor is actually
//! moving before trusting it (a stalled or disconnected motor must fault,
//! never report a calibrated axis), and optionally re-approaches the
//! stop at a slow speed for a repeatable contact point.

use crate::config::CalConfig;
use crate::motion::PulseFeedback;
use crate::traits::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Calibration progress, reported in telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalStatus {
    /// No calibration run has completed
    #[default]
    NotDone,
    /// Driving toward the end stop, waiting for the first pulse
    Started,
    /// Motor confirmed moving, seeking the end stop
    GotPulses,
    /// End stop contact made, counter reset
    EndStop,
    /// Calibration complete
    Ready,
}

/// Why a calibration run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalFault {
    /// No feedback pulses within the budget: motor stalled or disconnected
    NoPulses,
    /// End stop never asserted within the budget
    EndstopTimeout,
}

/// Sub-phase of the end-stop approach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekPhase {
    /// First approach at seek speed
    Seek,
    /// Backing off the stop before the slow re-approach
    Backoff,
    /// Slow second approach
    Reseek,
}

/// Drive output of one calibration tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalDrive {
    /// Drive magnitude in percent
    pub pwm: u8,
    /// Logical drive direction
    pub dir: Direction,
    /// When set, the pulse counter must be rewritten to this value
    pub reset_counter_to: Option<i32>,
}

impl CalDrive {
    fn stopped(dir: Direction) -> Self {
        Self {
            pwm: 0,
            dir,
            reset_counter_to: None,
        }
    }

    fn drive(pwm: u8, dir: Direction) -> Self {
        Self {
            pwm,
            dir,
            reset_counter_to: None,
        }
    }
}

/// Calibration run state for one axis
#[derive(Debug, Clone)]
pub struct Calibrator {
    cfg: CalConfig,
    status: CalStatus,
    phase: SeekPhase,
    fault: Option<CalFault>,
    last_rotated: i32,
    idle_ticks: u32,
    seek_ticks: u32,
    backoff_target: i32,
}

impl Calibrator {
    pub fn new(cfg: CalConfig) -> Self {
        Self {
            cfg,
            status: CalStatus::NotDone,
            phase: SeekPhase::Seek,
            fault: None,
            last_rotated: 0,
            idle_ticks: 0,
            seek_ticks: 0,
            backoff_target: 0,
        }
    }

    /// Current progress
    pub fn status(&self) -> CalStatus {
        self.status
    }

    /// Failure of the current run, if any
    pub fn fault(&self) -> Option<CalFault> {
        self.fault
    }

    /// True once the run has completed successfully
    pub fn is_ready(&self) -> bool {
        self.status == CalStatus::Ready
    }

    /// Force a fresh run, clearing any previous result or fault
    pub fn restart(&mut self) {
        self.status = CalStatus::NotDone;
        self.phase = SeekPhase::Seek;
        self.fault = None;
        self.idle_ticks = 0;
        self.seek_ticks = 0;
    }

    /// Advance the run by one control tick
    ///
    /// `rotated` is this tick's pulse counter snapshot, `at_end` the
    /// level of the configured target end stop.
    pub fn step(&mut self, rotated: i32, at_end: bool) -> CalDrive {
        let toward = self.cfg.direction;

        if self.fault.is_some() {
            return CalDrive::stopped(toward);
        }

        match self.status {
            CalStatus::NotDone => {
                self.status = CalStatus::Started;
                self.phase = SeekPhase::Seek;
                self.last_rotated = rotated;
                self.idle_ticks = 0;
                self.seek_ticks = 0;
                CalDrive::drive(self.cfg.seek_speed, toward)
            }
            CalStatus::Started => {
                if at_end {
                    // Axis is already resting on the stop.
                    self.status = CalStatus::GotPulses;
                    return self.contact(rotated);
                }
                if rotated != self.last_rotated {
                    self.last_rotated = rotated;
                    self.status = CalStatus::GotPulses;
                    return CalDrive::drive(self.cfg.seek_speed, toward);
                }
                self.idle_ticks += 1;
                if self.idle_ticks >= self.cfg.pulse_budget_ticks {
                    self.fault = Some(CalFault::NoPulses);
                    return CalDrive::stopped(toward);
                }
                CalDrive::drive(self.cfg.seek_speed, toward)
            }
            CalStatus::GotPulses => {
                self.seek_ticks += 1;
                if self.seek_ticks >= self.cfg.endstop_budget_ticks {
                    self.fault = Some(CalFault::EndstopTimeout);
                    return CalDrive::stopped(toward);
                }
                match self.phase {
                    SeekPhase::Seek => {
                        if at_end {
                            self.contact(rotated)
                        } else {
                            CalDrive::drive(self.cfg.seek_speed, toward)
                        }
                    }
                    SeekPhase::Backoff => {
                        let cleared = match toward {
                            Direction::Clockwise => rotated <= self.backoff_target,
                            Direction::CounterClockwise => rotated >= self.backoff_target,
                        };
                        if cleared && !at_end {
                            self.phase = SeekPhase::Reseek;
                            CalDrive::drive(self.cfg.fine_speed, toward)
                        } else {
                            CalDrive::drive(self.cfg.fine_speed, toward.opposite())
                        }
                    }
                    SeekPhase::Reseek => {
                        if at_end {
                            self.finish()
                        } else {
                            CalDrive::drive(self.cfg.fine_speed, toward)
                        }
                    }
                }
            }
            CalStatus::EndStop => {
                self.status = CalStatus::Ready;
                CalDrive::stopped(toward)
            }
            CalStatus::Ready => CalDrive::stopped(toward),
        }
    }

    /// Handle first contact: finish, or schedule the slow re-approach
    fn contact(&mut self, rotated: i32) -> CalDrive {
        if self.cfg.fine_speed > 0 && self.phase == SeekPhase::Seek {
            self.phase = SeekPhase::Backoff;
            self.backoff_target =
                rotated - self.cfg.direction.sign() * self.cfg.backoff_pulses as i32;
            CalDrive::drive(self.cfg.fine_speed, self.cfg.direction.opposite())
        } else {
            self.finish()
        }
    }

    /// Contact is final: stop and rewrite the counter to the offset
    fn finish(&mut self) -> CalDrive {
        self.status = CalStatus::EndStop;
        CalDrive {
            pwm: 0,
            dir: self.cfg.direction,
            reset_counter_to: Some(PulseFeedback::endstop_reset_value(self.cfg.offset_pulses)),
        }
    }
}
