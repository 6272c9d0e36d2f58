//! Board-agnostic control core for the rotordrive antenna rotator
//!
//! This crate contains all rotor control logic that does not depend on
//! specific hardware implementations:
//!
//! - Angle arithmetic (normalization, shortest error, azimuth branches)
//! - Pulse-count position feedback
//! - Error-distance speed profile
//! - End-stop calibration state machine
//! - Per-axis rotor controller and dual-axis goto coordination
//! - Stall supervision
//! - Configuration type definitions and startup validation
//!
//! All angles are integer millidegrees; the control loop is free of
//! floating point so it behaves identically on host and target.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod angle;
pub mod calibration;
pub mod config;
pub mod control;
pub mod motion;
pub mod safety;
pub mod telemetry;
pub mod traits;
