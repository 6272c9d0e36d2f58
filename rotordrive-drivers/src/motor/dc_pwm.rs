//! PWM-speed DC motor drive
//!
//! Drives an H-bridge with a direction pin, an optional inverted
//! direction pin, and a PWM duty output. The duty ceiling stays below
//! full scale when the bridge needs visible pulses to stay alive; the
//! direction-swap flag is applied here, at the pin boundary, so the
//! control core never sees wiring quirks.

use embedded_hal::digital::OutputPin;

use rotordrive_core::traits::{DcMotorDriver, Direction};

/// PWM DC drive configuration
#[derive(Debug, Clone, Copy)]
pub struct DcPwmConfig {
    /// Duty counter value at 100% drive
    pub max_duty: u8,
    /// Flip the direction outputs for this axis's wiring
    pub swap_dir: bool,
}

impl Default for DcPwmConfig {
    fn default() -> Self {
        Self {
            max_duty: 255,
            swap_dir: false,
        }
    }
}

/// PWM DC drive state
pub struct DcPwmMotor<DIR, DIN> {
    config: DcPwmConfig,
    dir_pin: DIR,
    dir_inv_pin: Option<DIN>,
    dir: Direction,
    pwm: u8,
}

impl<DIR: OutputPin, DIN: OutputPin> DcPwmMotor<DIR, DIN> {
    pub fn new(config: DcPwmConfig, dir_pin: DIR, dir_inv_pin: Option<DIN>) -> Self {
        Self {
            config,
            dir_pin,
            dir_inv_pin,
            dir: Direction::Clockwise,
            pwm: 0,
        }
    }

    /// Duty counter value for the current drive magnitude
    pub fn duty(&self) -> u8 {
        (self.pwm as u32 * self.config.max_duty as u32 / 100) as u8
    }

    /// Level the direction pin is set to for a logical direction
    fn dir_level(&self, dir: Direction) -> bool {
        (dir == Direction::Clockwise) ^ self.config.swap_dir
    }
}

impl<DIR: OutputPin, DIN: OutputPin> DcMotorDriver for DcPwmMotor<DIR, DIN> {
    fn apply(&mut self, dir: Direction, pwm: u8) {
        self.dir = dir;
        self.pwm = pwm.min(100);

        let level = self.dir_level(dir);
        if level {
            self.dir_pin.set_high().ok();
        } else {
            self.dir_pin.set_low().ok();
        }
        if let Some(inv) = self.dir_inv_pin.as_mut() {
            if level {
                inv.set_low().ok();
            } else {
                inv.set_high().ok();
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

    fn motor(swap: bool) -> DcPwmMotor<TestPin, TestPin> {
        DcPwmMotor::new(
            DcPwmConfig {
                max_duty: 255,
                swap_dir: swap,
            },
            TestPin::default(),
            Some(TestPin::default()),
        )
    }

    #[test]
    fn test_duty_scaling() {
        let mut m = motor(false);
        m.apply(Direction::Clockwise, 0);
        assert_eq!(m.duty(), 0);
        m.apply(Direction::Clockwise, 100);
        assert_eq!(m.duty(), 255);
        m.apply(Direction::Clockwise, 50);
        assert_eq!(m.duty(), 127);
        // Magnitude is capped at 100 percent.
        m.apply(Direction::Clockwise, 140);
        assert_eq!(m.duty(), 255);
    }

    #[test]
    fn test_direction_pins_complement() {
        let mut m = motor(false);
        m.apply(Direction::Clockwise, 60);
        assert!(m.dir_pin.high);
        assert!(!m.dir_inv_pin.as_ref().unwrap().high);

        m.apply(Direction::CounterClockwise, 60);
        assert!(!m.dir_pin.high);
        assert!(m.dir_inv_pin.as_ref().unwrap().high);
    }

    #[test]
    fn test_swap_dir_flips_pins_not_logic() {
        let mut m = motor(true);
        m.apply(Direction::Clockwise, 60);
        assert!(!m.dir_pin.high);
        // The logical direction is unchanged by the swap.
        assert_eq!(m.direction(), Direction::Clockwise);
    }

    #[test]
    fn test_stop_is_zero_duty() {
        let mut m = motor(false);
        m.apply(Direction::Clockwise, 80);
        m.stop();
        assert_eq!(m.pwm(), 0);
        assert!(m.is_stopped());
    }
}
