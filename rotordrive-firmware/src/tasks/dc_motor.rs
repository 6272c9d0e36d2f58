//! DC motor output tasks
//!
//! Apply the control tick's drive commands to the pins: PWM duty plus
//! complementary direction outputs for the PWM drive, or run/low-speed
//! outputs for the fixed-speed drive.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use rotordrive_core::control::MotorCommand;
use rotordrive_core::traits::DcMotorDriver;
use rotordrive_drivers::motor::{DcFixedConfig, DcFixedMotor, DcPwmConfig, DcPwmMotor};

use crate::config::PWM_TOP;

/// PWM DC motor task for one axis
#[embassy_executor::task(pool_size = 2)]
pub async fn dc_pwm_motor_task(
    mut pwm: Pwm<'static>,
    dir_pin: Output<'static>,
    dir_inv_pin: Option<Output<'static>>,
    commands: &'static Signal<CriticalSectionRawMutex, MotorCommand>,
    config: DcPwmConfig,
) {
    info!("DC PWM motor task started");

    let max_duty = config.max_duty;
    let mut motor = DcPwmMotor::new(config, dir_pin, dir_inv_pin);

    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = 0;
    pwm.set_config(&pwm_config);

    loop {
        let cmd = commands.wait().await;
        let MotorCommand::Dc { dir, pwm: magnitude } = cmd else {
            warn!("non-DC command on DC axis");
            continue;
        };

        motor.apply(dir, magnitude);
        let compare = motor.duty() as u32 * PWM_TOP as u32 / max_duty as u32;
        pwm_config.compare_a = compare as u16;
        pwm.set_config(&pwm_config);
    }
}

/// Fixed-speed DC motor task for one axis
#[embassy_executor::task(pool_size = 2)]
pub async fn dc_fixed_motor_task(
    run_pin: Output<'static>,
    dir_pin: Output<'static>,
    low_speed_pin: Option<Output<'static>>,
    commands: &'static Signal<CriticalSectionRawMutex, MotorCommand>,
    config: DcFixedConfig,
) {
    info!("DC fixed motor task started");

    let mut motor = DcFixedMotor::new(config, run_pin, dir_pin, low_speed_pin);

    loop {
        let cmd = commands.wait().await;
        let MotorCommand::Dc { dir, pwm: magnitude } = cmd else {
            warn!("non-DC command on DC axis");
            continue;
        };
        motor.apply(dir, magnitude);
    }
}
