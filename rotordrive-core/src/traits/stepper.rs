//! Stepper motor driver trait
//!
//! The controller hands the driver an absolute step target plus speed and
//! acceleration limits; pulse ramp generation stays inside the driver.

/// Trait for position-commanded stepper drivers
pub trait StepperDriver {
    /// Set the absolute target position in steps
    fn move_to(&mut self, target: i32);

    /// Set the maximum step rate in steps per second
    fn set_max_speed(&mut self, steps_per_s: u16);

    /// Set the acceleration limit in steps per second squared
    fn set_acceleration(&mut self, steps_per_s2: u16);

    /// Current position in steps
    fn position(&self) -> i32;

    /// Steps remaining to the target (signed)
    fn distance_to_go(&self) -> i32 {
        self.target() - self.position()
    }

    /// Current target position in steps
    fn target(&self) -> i32;

    /// Stop at the current position
    fn stop(&mut self);
}
