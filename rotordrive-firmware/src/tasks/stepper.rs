//! Stepper output task
//!
//! Consumes the control tick's target/speed/accel commands, generates
//! step edges at the ramped rate, and maintains the axis's pulse
//! counter (stepper axes have no feedback encoder; the issued steps
//! are the position).

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker, Timer};
use portable_atomic::{AtomicI32, Ordering};

use rotordrive_core::control::MotorCommand;
use rotordrive_core::traits::StepperDriver;
use rotordrive_drivers::stepper::SoftStepper;

/// Step generation period
const STEP_UPDATE_MS: u32 = 5;

/// Stepper task for one axis
#[embassy_executor::task(pool_size = 2)]
pub async fn stepper_task(
    mut step_pin: Output<'static>,
    mut dir_pin: Output<'static>,
    commands: &'static Signal<CriticalSectionRawMutex, MotorCommand>,
    pulses: &'static AtomicI32,
    swap_dir: bool,
) {
    info!("Stepper task started");

    let mut stepper = SoftStepper::new();
    let mut ticker = Ticker::every(Duration::from_millis(STEP_UPDATE_MS as u64));

    loop {
        if let Some(cmd) = commands.try_take() {
            let MotorCommand::Stepper {
                target,
                speed,
                accel,
            } = cmd
            else {
                warn!("non-stepper command on stepper axis");
                continue;
            };
            stepper.set_max_speed(speed);
            stepper.set_acceleration(accel);
            stepper.move_to(target);
        }

        // The control tick may have rebased the counter (calibration).
        let counted = pulses.load(Ordering::Relaxed);
        if counted != stepper.position() {
            stepper.set_position(counted);
        }

        let steps = stepper.update(STEP_UPDATE_MS);
        if steps != 0 {
            if (steps > 0) ^ swap_dir {
                dir_pin.set_high();
            } else {
                dir_pin.set_low();
            }
            for _ in 0..steps.unsigned_abs() {
                step_pin.set_high();
                Timer::after_micros(2).await;
                step_pin.set_low();
                Timer::after_micros(2).await;
            }
            pulses.fetch_add(steps, Ordering::Relaxed);
        }

        ticker.next().await;
    }
}
