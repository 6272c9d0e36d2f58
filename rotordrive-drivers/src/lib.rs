//! Motor drive implementations for the rotordrive antenna rotator
//!
//! Maps the control core's per-tick commands onto concrete drive
//! hardware: PWM DC bridges, fixed-speed DC drives with a low-speed
//! output, and position-commanded steppers. Everything here is pin-level
//! agnostic; the firmware owns the actual GPIO and PWM peripherals and
//! applies the states these drivers compute.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod motor;
pub mod stepper;
