//! Per-axis rotor controller
//!
//! One [`Rotor`] owns everything a single axis needs: pulse feedback,
//! the speed profile, the calibration run and stall supervision. Each
//! control tick it consumes a counter/end-stop snapshot and produces one
//! motor command; until the axis is calibrated the calibration state
//! machine has full control authority.

use crate::angle::{self, Millideg};
use crate::calibration::{CalStatus, Calibrator};
use crate::config::{AxisConfig, EndStop, MotorKind};
use crate::motion::{PulseFeedback, SpeedProfile};
use crate::safety::{Fault, StallMonitor};
use crate::telemetry::RotorSnapshot;
use crate::traits::Direction;

/// Counter and sensor snapshot for one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInput {
    /// Pulse counter, read as a consistent snapshot
    pub rotated: i32,
    /// End-stop sensor levels, sampled this tick
    pub at_end1: bool,
    pub at_end2: bool,
}

/// Motor command produced by one control tick
///
/// Closed over the supported motor kinds; the firmware dispatches on
/// this, never on driver internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorCommand {
    /// DC drive: direction plus 0..100 magnitude
    Dc { dir: Direction, pwm: u8 },
    /// Stepper drive: absolute step target plus ramp limits; pulse
    /// generation stays in the stepper driver
    Stepper { target: i32, speed: u16, accel: u16 },
}

/// Output of one control tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    pub command: MotorCommand,
    /// When set, the shared pulse counter must be rewritten before the
    /// next tick (calibration established a new reference)
    pub reset_counter_to: Option<i32>,
}

/// Control state of one rotor axis
pub struct Rotor {
    cfg: AxisConfig,
    feedback: PulseFeedback,
    profile: SpeedProfile,
    cal: Calibrator,
    stall: StallMonitor,
    /// Commanded target on the continuous scale
    target: Millideg,
    /// Measured position, normalized
    position: Millideg,
    /// Previous tick's position, for motion detection
    prev_position: Millideg,
    /// Signed shortest error toward the target
    error: Millideg,
    pwm: u8,
    dir: Direction,
    calibrated: bool,
    fault: Option<Fault>,
}

impl Rotor {
    pub fn new(cfg: AxisConfig) -> Self {
        let feedback = PulseFeedback::new(cfg.steps_per_rev, cfg.cal.reference);
        let profile = SpeedProfile::new(cfg.speed);
        let cal = Calibrator::new(cfg.cal);
        let stall = StallMonitor::new(cfg.stall_ticks);
        let target = cfg.cal.reference;
        Self {
            cfg,
            feedback,
            profile,
            cal,
            stall,
            target,
            position: 0,
            prev_position: 0,
            error: 0,
            pwm: 0,
            dir: Direction::Clockwise,
            calibrated: false,
            fault: None,
        }
    }

    /// Set a new target on the continuous scale
    ///
    /// Overwrites any previous target; there is no in-flight request to
    /// cancel, the next tick simply controls toward the new value.
    pub fn set_target(&mut self, target: Millideg) {
        self.target = target;
    }

    /// Hold the current position (stop commanding motion)
    pub fn hold(&mut self) {
        self.target = self.feedback.extended_degrees();
    }

    /// Discard the position reference and start a fresh calibration run
    pub fn recalibrate(&mut self) {
        self.calibrated = false;
        self.fault = None;
        self.cal.restart();
        self.stall.reset();
    }

    /// Clear a held fault; an uncalibrated axis retries calibration
    pub fn clear_fault(&mut self) {
        self.fault = None;
        self.stall.reset();
        if !self.calibrated {
            self.cal.restart();
        }
    }

    /// Run one control tick
    pub fn tick(&mut self, input: TickInput) -> TickOutput {
        self.feedback
            .update(input.rotated, input.at_end1, input.at_end2);
        self.position = self.feedback.degrees();

        let reset = if self.calibrated {
            self.control_tick();
            None
        } else {
            self.calibration_tick(input)
        };

        self.prev_position = self.position;
        TickOutput {
            command: self.motor_command(),
            reset_counter_to: reset,
        }
    }

    /// Tick while the calibration run has control authority
    fn calibration_tick(&mut self, input: TickInput) -> Option<i32> {
        let at_end = self.feedback.at_end(self.cfg.cal.target);
        let drive = self.cal.step(input.rotated, at_end);

        if let Some(value) = drive.reset_counter_to {
            // Re-read the position against the fresh reference.
            self.feedback.update(value, input.at_end1, input.at_end2);
            self.position = self.feedback.degrees();
        }
        if self.cal.is_ready() {
            self.calibrated = true;
            self.stall.reset();
        }
        if let Some(fault) = self.cal.fault() {
            self.fault = Some(Fault::Calibration(fault));
        }

        self.error = 0;
        self.pwm = if self.fault.is_some() { 0 } else { drive.pwm };
        self.dir = drive.dir;
        drive.reset_counter_to
    }

    /// Tick under normal closed-loop control
    fn control_tick(&mut self) {
        self.error = angle::shortest_error(self.position, angle::normalize(self.target));
        let drive = self.profile.command(self.error);

        let moved = self.position != self.prev_position;
        if self
            .stall
            .update(drive.pwm, moved, self.feedback.at_any_end())
        {
            self.fault = Some(Fault::Stall);
        }

        self.pwm = if self.fault.is_some() { 0 } else { drive.pwm };
        self.dir = drive.dir;
    }

    /// Map the tick result onto the configured motor kind
    fn motor_command(&self) -> MotorCommand {
        match self.cfg.motor {
            MotorKind::DcPwm { .. } | MotorKind::DcFixed { .. } => MotorCommand::Dc {
                dir: self.dir,
                pwm: self.pwm,
            },
            MotorKind::Stepper {
                max_speed,
                max_accel,
            } => {
                let rotated = self.feedback.rotated();
                let target = if self.pwm == 0 {
                    rotated
                } else if self.calibrated {
                    rotated + angle::mdeg_to_pulses(self.error, self.cfg.steps_per_rev)
                } else {
                    // Seeking the end stop: keep the target a revolution
                    // ahead, re-issued every tick.
                    rotated + self.dir.sign() * self.cfg.steps_per_rev
                };
                MotorCommand::Stepper {
                    target,
                    speed: (max_speed as u32 * self.pwm as u32 / 100) as u16,
                    accel: max_accel,
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.cfg.name
    }

    pub fn id(&self) -> u8 {
        self.cfg.id
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    pub fn cal_status(&self) -> CalStatus {
        self.cal.status()
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Measured position, normalized millidegrees
    pub fn position(&self) -> Millideg {
        self.position
    }

    /// Measured position on the continuous scale (keeps the turn count)
    pub fn extended_position(&self) -> Millideg {
        self.feedback.extended_degrees()
    }

    /// Commanded target on the continuous scale
    pub fn target(&self) -> Millideg {
        self.target
    }

    /// Signed shortest error toward the target
    pub fn error(&self) -> Millideg {
        self.error
    }

    pub fn pwm(&self) -> u8 {
        self.pwm
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Publishable state for monitor consumers
    pub fn snapshot(&self) -> RotorSnapshot {
        RotorSnapshot {
            id: self.cfg.id,
            position: self.position,
            target: self.target,
            error: self.error,
            pwm: self.pwm,
            dir: self.dir,
            cal_status: self.cal.status(),
            calibrated: self.calibrated,
            at_end1: self.feedback.at_end(EndStop::End1),
            at_end2: self.feedback.at_end(EndStop::End2),
            rounds: self.feedback.rounds(),
            fault: self.fault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalConfig, PinAssignment, SpeedConfig};

    fn axis_config() -> AxisConfig {
        AxisConfig {
            name: "azi",
            id: 2,
            steps_per_rev: 1080,
            speed: SpeedConfig::default(),
            cal: CalConfig {
                offset_pulses: 0,
                pulse_budget_ticks: 5,
                ..CalConfig::default()
            },
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
            stall_ticks: 5,
        }
    }

    fn input(rotated: i32) -> TickInput {
        TickInput {
            rotated,
            at_end1: false,
            at_end2: false,
        }
    }

    /// Drive a simulated calibration run to completion: the axis starts
    /// at pulse 50 and the end stop asserts at pulse 0.
    fn run_calibration(rotor: &mut Rotor) -> i32 {
        let mut rotated = 50i32;
        let mut at_end = false;
        for _ in 0..200 {
            if rotor.is_calibrated() {
                break;
            }
            let out = rotor.tick(TickInput {
                rotated,
                at_end1: at_end,
                at_end2: false,
            });
            if let Some(value) = out.reset_counter_to {
                rotated = value;
            } else if let MotorCommand::Dc { dir, pwm } = out.command {
                if pwm > 0 {
                    rotated += dir.sign() * 2;
                }
            }
            at_end = rotated <= 0;
        }
        assert!(rotor.is_calibrated());
        rotated
    }

    #[test]
    fn test_uncalibrated_delegates_to_calibration() {
        let mut rotor = Rotor::new(axis_config());
        let out = rotor.tick(input(0));
        assert_eq!(rotor.cal_status(), CalStatus::Started);
        assert!(!rotor.is_calibrated());
        // The calibration run owns the drive output.
        assert_eq!(
            out.command,
            MotorCommand::Dc {
                dir: Direction::CounterClockwise,
                pwm: 100,
            }
        );
    }

    #[test]
    fn test_calibration_establishes_reference() {
        let mut rotor = Rotor::new(axis_config());
        let rotated = run_calibration(&mut rotor);
        assert_eq!(rotor.cal_status(), CalStatus::Ready);
        assert_eq!(rotated, 0);
        assert_eq!(rotor.position(), 0);
        assert_eq!(rotor.snapshot().rounds, 0);
    }

    #[test]
    fn test_small_error_interpolates_speed() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);

        // 5 degrees of error falls on the ramp: strictly between the
        // configured min and max speeds, direction increasing.
        rotor.set_target(5_000);
        let out = rotor.tick(input(0));
        assert_eq!(rotor.error(), 5_000);
        match out.command {
            MotorCommand::Dc { dir, pwm } => {
                assert_eq!(dir, Direction::Clockwise);
                assert!(pwm > 50 && pwm < 100);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_on_target_commands_no_motion() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);

        // 100.0 degrees measured, 100.1 requested: inside the stop band.
        rotor.set_target(100_100);
        let out = rotor.tick(input(300));
        assert_eq!(rotor.position(), 100_000);
        assert_eq!(rotor.error(), 100);
        assert_eq!(
            out.command,
            MotorCommand::Dc {
                dir: Direction::Clockwise,
                pwm: 0,
            }
        );
    }

    #[test]
    fn test_stall_faults_and_stops() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);

        rotor.set_target(90_000);
        for _ in 0..10 {
            rotor.tick(input(0));
        }
        assert_eq!(rotor.fault(), Some(Fault::Stall));
        let out = rotor.tick(input(0));
        assert_eq!(
            out.command,
            MotorCommand::Dc {
                dir: Direction::Clockwise,
                pwm: 0,
            }
        );
        // Still calibrated; the fault only gates the drive.
        assert!(rotor.is_calibrated());
    }

    #[test]
    fn test_clear_fault_resumes_control() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);

        rotor.set_target(90_000);
        for _ in 0..10 {
            rotor.tick(input(0));
        }
        assert_eq!(rotor.fault(), Some(Fault::Stall));

        rotor.clear_fault();
        let out = rotor.tick(input(0));
        assert_eq!(rotor.fault(), None);
        match out.command {
            MotorCommand::Dc { pwm, .. } => assert_eq!(pwm, 100),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_recalibrate_restarts_the_run() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);
        assert!(rotor.is_calibrated());

        rotor.recalibrate();
        assert!(!rotor.is_calibrated());
        assert_eq!(rotor.cal_status(), CalStatus::NotDone);
        run_calibration(&mut rotor);
    }

    #[test]
    fn test_hold_stops_at_current_position() {
        let mut rotor = Rotor::new(axis_config());
        run_calibration(&mut rotor);

        rotor.set_target(90_000);
        rotor.tick(input(0));
        assert!(rotor.pwm() > 0);

        rotor.hold();
        let out = rotor.tick(input(0));
        assert_eq!(
            out.command,
            MotorCommand::Dc {
                dir: Direction::Clockwise,
                pwm: 0,
            }
        );
    }

    #[test]
    fn test_stepper_targets_shortest_path() {
        let mut cfg = axis_config();
        cfg.motor = MotorKind::Stepper {
            max_speed: 100,
            max_accel: 50,
        };
        let mut rotor = Rotor::new(cfg);

        // Calibration seeks with a far-ahead target.
        let out = rotor.tick(input(0));
        match out.command {
            MotorCommand::Stepper { target, speed, .. } => {
                assert_eq!(target, -1080);
                assert_eq!(speed, 100);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_no_pulses_during_calibration_faults() {
        let mut rotor = Rotor::new(axis_config());
        for _ in 0..10 {
            rotor.tick(input(0));
        }
        assert_eq!(
            rotor.fault(),
            Some(Fault::Calibration(crate::calibration::CalFault::NoPulses))
        );
        assert!(!rotor.is_calibrated());
        let out = rotor.tick(input(0));
        assert_eq!(
            out.command,
            MotorCommand::Dc {
                dir: Direction::CounterClockwise,
                pwm: 0,
            }
        );
    }
}
