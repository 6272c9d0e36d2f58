//! Board configuration
//!
//! Per-axis rotor characteristics and pin bindings for the reference
//! board. Everything funnels into one validated [`SystemConfig`] at
//! boot; nothing here is read anywhere else at runtime.

use rotordrive_core::angle::AzimuthRange;
use rotordrive_core::config::{
    AxisConfig, CalConfig, EndStop, MotorKind, PinAssignment, RotorKind, SpeedConfig, Span,
    SystemConfig,
};
use rotordrive_core::traits::Direction;

/// Firmware release identifier, reported at boot
pub const VERSION: &str = "0.1.0";

/// Monitor UART baud rate
pub const MONITOR_BAUD: u32 = 19_200;

/// Control loop period
pub const CONTROL_TICK_MS: u64 = 10;

/// Monitor report period
pub const MONITOR_PERIOD_MS: u64 = 250;

/// PWM counter top for a 10 kHz carrier at 125 MHz system clock
pub const PWM_TOP: u16 = 12_500;

// Pin map (RP2040 GPIO numbers)
pub const PIN_PULSE_AX: u8 = 2; // input pulses (interrupt)
pub const PIN_PULSE_EY: u8 = 3;
pub const PIN_DIR_AX: u8 = 4; // output direction
pub const PIN_DIR_INV_AX: u8 = 5; // inverted output direction
pub const PIN_DIR_EY: u8 = 7;
pub const PIN_DIR_INV_EY: u8 = 8;
pub const PIN_PWM_AX: u8 = 10; // output speed (pwm), PWM slice 5 A
pub const PIN_PWM_EY: u8 = 6; // output speed (pwm), PWM slice 3 A
pub const PIN_ENDSW_AX: u8 = 11; // end stop inputs
pub const PIN_ENDSW_EY: u8 = 12;

/// Feedback pulses per 360 degrees
const STEPS_PER_REV: i32 = 3 * 360;

/// Pulses from the end stop to the reference position
const ENDSTOP_OFFSET_PULSES: i32 = 10;

fn axis(
    name: &'static str,
    id: u8,
    pins: PinAssignment,
    cal_direction: Direction,
) -> AxisConfig {
    AxisConfig {
        name,
        id,
        steps_per_rev: STEPS_PER_REV,
        speed: SpeedConfig {
            min_speed: 50,
            max_speed: 100,
            max_speed_above: 10_000,
            min_speed_below: 2_000,
            stop_within: 200,
        },
        cal: CalConfig {
            seek_speed: 100,
            fine_speed: 0,
            backoff_pulses: 20,
            target: EndStop::End1,
            direction: cal_direction,
            offset_pulses: ENDSTOP_OFFSET_PULSES,
            reference: 0,
            // 10 ms ticks: one second without a pulse is a dead motor,
            // two minutes without the stop is a broken switch.
            pulse_budget_ticks: 100,
            endstop_budget_ticks: 12_000,
        },
        swap_dir: false,
        motor: MotorKind::DcPwm { max_duty: 255 },
        pins,
        stall_ticks: 100,
    }
}

/// Assemble the full two-axis configuration
pub fn system_config() -> SystemConfig {
    SystemConfig {
        kind: RotorKind::AzimuthElevation,
        azimuth: axis(
            "azi",
            2,
            PinAssignment {
                pulse: Some(PIN_PULSE_AX),
                dir: Some(PIN_DIR_AX),
                dir_inv: Some(PIN_DIR_INV_AX),
                low_speed: None,
                pwm: Some(PIN_PWM_AX),
                end1: Some(PIN_ENDSW_AX),
                end2: None,
            },
            Direction::CounterClockwise,
        ),
        elevation: axis(
            "ele",
            1,
            PinAssignment {
                pulse: Some(PIN_PULSE_EY),
                dir: Some(PIN_DIR_EY),
                dir_inv: Some(PIN_DIR_INV_EY),
                low_speed: None,
                pwm: Some(PIN_PWM_EY),
                end1: Some(PIN_ENDSW_EY),
                end2: None,
            },
            Direction::CounterClockwise,
        ),
        // The azimuth rotor covers 340..200 through north; 200..340 is
        // mechanically forbidden.
        azimuth_range: AzimuthRange {
            min: 340_000,
            max: 200_000,
        },
        elevation_span: Some(Span {
            min: 0,
            max: 180_000,
        }),
        use_east_west: true,
        full_range_azimuth: false,
    }
}
