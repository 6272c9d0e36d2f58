//! Fixed-speed DC motor drive
//!
//! No duty cycle: the motor is either running or not, and a separate
//! low-speed output tells the drive hardware to switch to its slow
//! winding when the commanded magnitude drops below the threshold.

use embedded_hal::digital::OutputPin;

use rotordrive_core::traits::{DcMotorDriver, Direction};

/// Fixed-speed DC drive configuration
#[derive(Debug, Clone, Copy)]
pub struct DcFixedConfig {
    /// At or below this drive percent the low-speed output is asserted
    pub low_speed_below: u8,
    /// Flip the direction outputs for this axis's wiring
    pub swap_dir: bool,
}

impl Default for DcFixedConfig {
    fn default() -> Self {
        Self {
            low_speed_below: 20,
            swap_dir: false,
        }
    }
}

/// Fixed-speed DC drive state
pub struct DcFixedMotor<RUN, DIR, LSP> {
    config: DcFixedConfig,
    run_pin: RUN,
    dir_pin: DIR,
    low_speed_pin: Option<LSP>,
    dir: Direction,
    pwm: u8,
}

impl<RUN: OutputPin, DIR: OutputPin, LSP: OutputPin> DcFixedMotor<RUN, DIR, LSP> {
    pub fn new(
        config: DcFixedConfig,
        run_pin: RUN,
        dir_pin: DIR,
        low_speed_pin: Option<LSP>,
    ) -> Self {
        Self {
            config,
            run_pin,
            dir_pin,
            low_speed_pin,
            dir: Direction::Clockwise,
            pwm: 0,
        }
    }

    /// True when the low-speed winding is selected
    pub fn low_speed_active(&self) -> bool {
        self.pwm > 0 && self.pwm <= self.config.low_speed_below
    }
}

impl<RUN: OutputPin, DIR: OutputPin, LSP: OutputPin> DcMotorDriver
    for DcFixedMotor<RUN, DIR, LSP>
{
    fn apply(&mut self, dir: Direction, pwm: u8) {
        self.dir = dir;
        self.pwm = pwm.min(100);

        if (dir == Direction::Clockwise) ^ self.config.swap_dir {
            self.dir_pin.set_high().ok();
        } else {
            self.dir_pin.set_low().ok();
        }
        if self.pwm > 0 {
            self.run_pin.set_high().ok();
        } else {
            self.run_pin.set_low().ok();
        }
        if let Some(lsp) = self.low_speed_pin.as_mut() {
            if self.pwm > 0 && self.pwm <= self.config.low_speed_below {
                lsp.set_high().ok();
            } else {
                lsp.set_low().ok();
            }
        }
    }

    fn direction(&self) -> Direction {
        self.dir
    }

    fn pwm(&self) -> u8 {
        self.pwm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[derive(Debug, Default)]
    struct TestPin {
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for TestPin {
        type Error = Infallible;
    }

    impl OutputPin for TestPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    fn motor() -> DcFixedMotor<TestPin, TestPin, TestPin> {
        DcFixedMotor::new(
            DcFixedConfig::default(),
            TestPin::default(),
            TestPin::default(),
            Some(TestPin::default()),
        )
    }

    #[test]
    fn test_run_pin_follows_magnitude() {
        let mut m = motor();
        m.apply(Direction::Clockwise, 50);
        assert!(m.run_pin.high);
        m.apply(Direction::Clockwise, 0);
        assert!(!m.run_pin.high);
    }

    #[test]
    fn test_low_speed_asserted_below_threshold() {
        let mut m = motor();
        m.apply(Direction::Clockwise, 15);
        assert!(m.low_speed_active());
        assert!(m.low_speed_pin.as_ref().unwrap().high);

        m.apply(Direction::Clockwise, 50);
        assert!(!m.low_speed_active());
        assert!(!m.low_speed_pin.as_ref().unwrap().high);

        // Stopped is not "low speed".
        m.apply(Direction::Clockwise, 0);
        assert!(!m.low_speed_active());
        assert!(!m.low_speed_pin.as_ref().unwrap().high);
    }
}
