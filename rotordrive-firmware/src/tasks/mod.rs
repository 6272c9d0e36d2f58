//! Embassy tasks

pub mod control;
pub mod dc_motor;
pub mod monitor;
pub mod pulse;
pub mod status_led;
pub mod stepper;
