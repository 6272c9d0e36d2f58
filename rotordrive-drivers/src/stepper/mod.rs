//! Software step generation for position-commanded steppers
//!
//! The control core only hands the stepper path an absolute target and
//! ramp limits; this generator turns that into step counts per update
//! period for a firmware task to emit as pin edges. Speed ramps up at
//! the acceleration limit and the generator stops dead on the target,
//! which is adequate at rotor step rates.

use rotordrive_core::traits::StepperDriver;

/// Step generator state for one axis
#[derive(Debug, Clone)]
pub struct SoftStepper {
    position: i32,
    target: i32,
    max_speed: u16,
    accel: u16,
    /// Current step rate, steps/s scaled by 1000
    speed_x1000: u32,
    /// Fractional step accumulator, steps scaled by 1000
    accum_x1000: u32,
}

impl Default for SoftStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftStepper {
    pub fn new() -> Self {
        Self {
            position: 0,
            target: 0,
            max_speed: 0,
            accel: 0,
            speed_x1000: 0,
            accum_x1000: 0,
        }
    }

    /// Overwrite the position reference (after calibration)
    pub fn set_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
    }

    /// Current ramped step rate in steps/s
    pub fn current_speed(&self) -> u16 {
        (self.speed_x1000 / 1000) as u16
    }

    /// Advance by `delta_ms`; returns the signed steps to emit now
    ///
    /// The caller pulses the step pin that many times with the direction
    /// pin matching the sign.
    pub fn update(&mut self, delta_ms: u32) -> i32 {
        let remaining = self.target - self.position;
        if remaining == 0 || self.max_speed == 0 {
            self.speed_x1000 = 0;
            self.accum_x1000 = 0;
            return 0;
        }

        // Ramp toward the speed limit.
        let limit = self.max_speed as u32 * 1000;
        let gain = self.accel as u32 * delta_ms;
        self.speed_x1000 = (self.speed_x1000 + gain).min(limit);

        // Accumulate fractional steps across updates.
        self.accum_x1000 += self.speed_x1000 * delta_ms / 1000;
        let mut steps = (self.accum_x1000 / 1000) as i32;
        self.accum_x1000 %= 1000;

        steps = steps.min(remaining.abs());
        if remaining < 0 {
            steps = -steps;
        }
        self.position += steps;
        steps
    }
}

impl StepperDriver for SoftStepper {
    fn move_to(&mut self, target: i32) {
        self.target = target;
    }

    fn set_max_speed(&mut self, steps_per_s: u16) {
        self.max_speed = steps_per_s;
    }

    fn set_acceleration(&mut self, steps_per_s2: u16) {
        self.accel = steps_per_s2;
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn target(&self) -> i32 {
        self.target
    }

    fn stop(&mut self) {
        self.target = self.position;
        self.speed_x1000 = 0;
        self.accum_x1000 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepper() -> SoftStepper {
        let mut s = SoftStepper::new();
        s.set_max_speed(100);
        s.set_acceleration(1000);
        s
    }

    #[test]
    fn test_reaches_target_exactly() {
        let mut s = stepper();
        s.move_to(50);

        let mut total = 0;
        for _ in 0..50 {
            total += s.update(100);
        }
        assert_eq!(total, 50);
        assert_eq!(s.position(), 50);
        assert_eq!(s.distance_to_go(), 0);
        assert_eq!(s.update(100), 0);
    }

    #[test]
    fn test_negative_moves_emit_negative_steps() {
        let mut s = stepper();
        s.move_to(-30);

        let mut total = 0;
        for _ in 0..50 {
            total += s.update(100);
        }
        assert_eq!(total, -30);
        assert_eq!(s.position(), -30);
    }

    #[test]
    fn test_speed_ramps_to_limit() {
        let mut s = SoftStepper::new();
        s.set_max_speed(100);
        s.set_acceleration(50);
        s.move_to(10_000);

        s.update(1000);
        assert_eq!(s.current_speed(), 50);
        s.update(1000);
        assert_eq!(s.current_speed(), 100);
        // Clamped at the limit.
        s.update(1000);
        assert_eq!(s.current_speed(), 100);
    }

    #[test]
    fn test_stop_holds_position() {
        let mut s = stepper();
        s.move_to(1_000);
        s.update(100);
        let held = s.position();
        s.stop();
        assert_eq!(s.target(), held);
        assert_eq!(s.update(100), 0);
    }

    #[test]
    fn test_set_position_rebases_reference() {
        let mut s = stepper();
        s.move_to(100);
        s.update(500);
        s.set_position(-10);
        assert_eq!(s.position(), -10);
        assert_eq!(s.distance_to_go(), 0);
    }

    #[test]
    fn test_fractional_steps_accumulate() {
        let mut s = SoftStepper::new();
        s.set_max_speed(3);
        s.set_acceleration(1000);
        s.move_to(3);

        // 3 steps/s at 100ms per update: a step roughly every fourth call.
        let mut total = 0;
        for _ in 0..10 {
            total += s.update(100);
        }
        assert_eq!(total, 3);
    }
}
