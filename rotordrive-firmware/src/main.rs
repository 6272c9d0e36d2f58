//! Rotordrive - Two-Axis Antenna Rotor Firmware
//!
//! Main firmware binary for RP2040-based rotor controller boards.
//! Points an azimuth/elevation (or X/Y) antenna rotator at a moving
//! target: pulse-feedback position control per axis, end-stop
//! self-calibration, east/west pass handling, and a framed UART link
//! to the tracking/monitor side.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rotordrive_core::config::MotorKind;
use rotordrive_drivers::motor::{DcFixedConfig, DcPwmConfig};

use crate::channels::{
    AX_DIR_CLOCKWISE, AX_MOTOR_CMD, AX_PULSES, EY_DIR_CLOCKWISE, EY_MOTOR_CMD, EY_PULSES,
};
use crate::tasks::control::control_task;
use crate::tasks::dc_motor::{dc_fixed_motor_task, dc_pwm_motor_task};
use crate::tasks::monitor::{monitor_rx_task, monitor_tx_task};
use crate::tasks::pulse::pulse_task;
use crate::tasks::status_led::{status_led_task, AxisLeds};
use crate::tasks::stepper::stepper_task;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("rotordrive {} starting...", config::VERSION);

    let p = embassy_rp::init(Default::default());

    let cfg = config::system_config();
    if let Err(e) = cfg.validate() {
        // A broken configuration must never move a rotor.
        defmt::panic!("invalid configuration: {:?}", e);
    }
    info!(
        "axes: {} (id {}) / {} (id {})",
        cfg.azimuth.name, cfg.azimuth.id, cfg.elevation.name, cfg.elevation.id
    );

    // Monitor/tracker UART link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::MONITOR_BAUD;
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        TX_BUF.init([0; 256]),
        RX_BUF.init([0; 256]),
        uart_config,
    );
    let (tx, rx) = uart.split();
    unwrap!(spawner.spawn(monitor_tx_task(tx)));
    unwrap!(spawner.spawn(monitor_rx_task(rx)));

    // Azimuth motor outputs (speed on GPIO 10 = PWM slice 5 channel A)
    match cfg.azimuth.motor {
        MotorKind::DcPwm { max_duty } => {
            let pwm = Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, PwmConfig::default());
            let dir = Output::new(p.PIN_4, Level::Low);
            let dir_inv = Output::new(p.PIN_5, Level::High);
            unwrap!(spawner.spawn(dc_pwm_motor_task(
                pwm,
                dir,
                Some(dir_inv),
                &AX_MOTOR_CMD,
                DcPwmConfig {
                    max_duty,
                    swap_dir: cfg.azimuth.swap_dir,
                },
            )));
        }
        MotorKind::DcFixed { low_speed_below } => {
            let run = Output::new(p.PIN_10, Level::Low);
            let dir = Output::new(p.PIN_4, Level::Low);
            unwrap!(spawner.spawn(dc_fixed_motor_task(
                run,
                dir,
                None,
                &AX_MOTOR_CMD,
                DcFixedConfig {
                    low_speed_below,
                    swap_dir: cfg.azimuth.swap_dir,
                },
            )));
        }
        MotorKind::Stepper { .. } => {
            let step = Output::new(p.PIN_10, Level::Low);
            let dir = Output::new(p.PIN_4, Level::Low);
            unwrap!(spawner.spawn(stepper_task(
                step,
                dir,
                &AX_MOTOR_CMD,
                &AX_PULSES,
                cfg.azimuth.swap_dir,
            )));
        }
    }

    // Elevation motor outputs (speed on GPIO 6 = PWM slice 3 channel A)
    match cfg.elevation.motor {
        MotorKind::DcPwm { max_duty } => {
            let pwm = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, PwmConfig::default());
            let dir = Output::new(p.PIN_7, Level::Low);
            let dir_inv = Output::new(p.PIN_8, Level::High);
            unwrap!(spawner.spawn(dc_pwm_motor_task(
                pwm,
                dir,
                Some(dir_inv),
                &EY_MOTOR_CMD,
                DcPwmConfig {
                    max_duty,
                    swap_dir: cfg.elevation.swap_dir,
                },
            )));
        }
        MotorKind::DcFixed { low_speed_below } => {
            let run = Output::new(p.PIN_6, Level::Low);
            let dir = Output::new(p.PIN_7, Level::Low);
            unwrap!(spawner.spawn(dc_fixed_motor_task(
                run,
                dir,
                None,
                &EY_MOTOR_CMD,
                DcFixedConfig {
                    low_speed_below,
                    swap_dir: cfg.elevation.swap_dir,
                },
            )));
        }
        MotorKind::Stepper { .. } => {
            let step = Output::new(p.PIN_6, Level::Low);
            let dir = Output::new(p.PIN_7, Level::Low);
            unwrap!(spawner.spawn(stepper_task(
                step,
                dir,
                &EY_MOTOR_CMD,
                &EY_PULSES,
                cfg.elevation.swap_dir,
            )));
        }
    }

    // Feedback pulse inputs (DC drives; stepper axes count issued steps)
    if !matches!(cfg.azimuth.motor, MotorKind::Stepper { .. }) {
        let pulse = Input::new(p.PIN_2, Pull::Up);
        unwrap!(spawner.spawn(pulse_task(pulse, &AX_PULSES, &AX_DIR_CLOCKWISE)));
    }
    if !matches!(cfg.elevation.motor, MotorKind::Stepper { .. }) {
        let pulse = Input::new(p.PIN_3, Pull::Up);
        unwrap!(spawner.spawn(pulse_task(pulse, &EY_PULSES, &EY_DIR_CLOCKWISE)));
    }

    // End-stop inputs, sampled by the control tick
    let ax_end1 = Some(Input::new(p.PIN_11, Pull::Up));
    let ey_end1 = Some(Input::new(p.PIN_12, Pull::Up));
    unwrap!(spawner.spawn(control_task(cfg, ax_end1, None, ey_end1, None)));

    // Per-axis RGB status LEDs
    let azimuth_leds = AxisLeds {
        red: Output::new(p.PIN_16, Level::Low),
        green: Output::new(p.PIN_17, Level::Low),
        blue: Output::new(p.PIN_18, Level::Low),
    };
    let elevation_leds = AxisLeds {
        red: Output::new(p.PIN_19, Level::Low),
        green: Output::new(p.PIN_20, Level::Low),
        blue: Output::new(p.PIN_21, Level::Low),
    };
    unwrap!(spawner.spawn(status_led_task(azimuth_leds, elevation_leds)));

    info!("rotordrive up");
}
