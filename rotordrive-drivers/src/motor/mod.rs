//! DC motor drives

mod dc_fixed;
mod dc_pwm;

pub use dc_fixed::{DcFixedConfig, DcFixedMotor};
pub use dc_pwm::{DcPwmConfig, DcPwmMotor};
