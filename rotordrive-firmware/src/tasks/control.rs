//! Control tick task
//!
//! Runs both axis controllers on a fixed period: drains tracker
//! commands, snapshots the pulse counters, samples the end stops,
//! ticks each rotor and publishes the resulting motor commands and
//! telemetry. The tick itself never blocks on anything.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};
use portable_atomic::{AtomicBool, AtomicI32, Ordering};

use rotordrive_core::config::SystemConfig;
use rotordrive_core::control::{Axis, Coordinator, MotorCommand, Rotor, TickInput};
use rotordrive_core::traits::Direction;
use rotordrive_protocol::{MonitorReport, TrackerCommand};

use crate::channels::{
    AX_DIR_CLOCKWISE, AX_MOTOR_CMD, AX_PULSES, COMMAND_CHANNEL, EY_DIR_CLOCKWISE, EY_MOTOR_CMD,
    EY_PULSES, LED_REPORT, PONG_REQUEST, REPORT,
};
use crate::config::CONTROL_TICK_MS;

/// End-stop switches are normally open to ground with pull-ups
fn endstop_level(pin: &Option<Input<'static>>) -> bool {
    pin.as_ref().map(|p| p.is_low()).unwrap_or(false)
}

/// Tick one axis: snapshot, control, publish
fn tick_axis(
    rotor: &mut Rotor,
    pulses: &'static AtomicI32,
    clockwise: &'static AtomicBool,
    end1: &Option<Input<'static>>,
    end2: &Option<Input<'static>>,
    commands: &'static Signal<CriticalSectionRawMutex, MotorCommand>,
) {
    let input = TickInput {
        rotated: pulses.load(Ordering::Relaxed),
        at_end1: endstop_level(end1),
        at_end2: endstop_level(end2),
    };
    let out = rotor.tick(input);

    if let Some(value) = out.reset_counter_to {
        debug!("{}: counter reset to {}", rotor.name(), value);
        pulses.store(value, Ordering::Relaxed);
    }

    let cw = match out.command {
        MotorCommand::Dc { dir, .. } => dir == Direction::Clockwise,
        MotorCommand::Stepper { target, .. } => target >= input.rotated,
    };
    clockwise.store(cw, Ordering::Relaxed);
    commands.signal(out.command);
}

/// Control task owning both rotor axes
#[embassy_executor::task]
pub async fn control_task(
    cfg: SystemConfig,
    ax_end1: Option<Input<'static>>,
    ax_end2: Option<Input<'static>>,
    ey_end1: Option<Input<'static>>,
    ey_end2: Option<Input<'static>>,
) {
    info!("Control task started");

    let mut azimuth = Rotor::new(cfg.azimuth.clone());
    let mut elevation = Rotor::new(cfg.elevation.clone());
    let mut coordinator = Coordinator::new(&cfg);

    let started = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));

    loop {
        // Apply everything the tracker sent since the last tick; a
        // newer goto simply overwrites the previous targets.
        while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
            match cmd {
                TrackerCommand::Goto(goto) => {
                    trace!("goto ax={} ey={}", goto.ax, goto.ey);
                    coordinator.apply(&goto, &mut azimuth, &mut elevation);
                }
                TrackerCommand::Recalibrate(Axis::Azimuth) => azimuth.recalibrate(),
                TrackerCommand::Recalibrate(Axis::Elevation) => elevation.recalibrate(),
                TrackerCommand::ClearFault(Axis::Azimuth) => azimuth.clear_fault(),
                TrackerCommand::ClearFault(Axis::Elevation) => elevation.clear_fault(),
                TrackerCommand::Halt => {
                    warn!("halt requested");
                    azimuth.hold();
                    elevation.hold();
                }
                TrackerCommand::Ping => PONG_REQUEST.signal(()),
            }
        }

        tick_axis(
            &mut azimuth,
            &AX_PULSES,
            &AX_DIR_CLOCKWISE,
            &ax_end1,
            &ax_end2,
            &AX_MOTOR_CMD,
        );
        tick_axis(
            &mut elevation,
            &EY_PULSES,
            &EY_DIR_CLOCKWISE,
            &ey_end1,
            &ey_end2,
            &EY_MOTOR_CMD,
        );

        let report = MonitorReport {
            uptime_ms: started.elapsed().as_millis() as u32,
            range_violations: coordinator.range_violations(),
            azimuth: azimuth.snapshot(),
            elevation: elevation.snapshot(),
        };
        REPORT.signal(report);
        LED_REPORT.signal(report);

        ticker.next().await;
    }
}
