//! Inter-task communication
//!
//! Static channels, signals and counters shared between Embassy tasks.
//! The per-axis pulse counters are the only state touched from both the
//! edge-interrupt context and the control tick; they are atomics, read
//! as one consistent snapshot per tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicI32};

use rotordrive_core::control::MotorCommand;
use rotordrive_protocol::{MonitorReport, TrackerCommand};

/// Channel capacity for tracker commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Azimuth pulse counter, written per edge, snapshot-read per tick
pub static AX_PULSES: AtomicI32 = AtomicI32::new(0);

/// Elevation pulse counter
pub static EY_PULSES: AtomicI32 = AtomicI32::new(0);

/// Azimuth count direction; takes effect at the next pulse edge
pub static AX_DIR_CLOCKWISE: AtomicBool = AtomicBool::new(true);

/// Elevation count direction
pub static EY_DIR_CLOCKWISE: AtomicBool = AtomicBool::new(true);

/// Tracker commands parsed from the monitor link
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, TrackerCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Azimuth motor command (updated by the control tick)
pub static AX_MOTOR_CMD: Signal<CriticalSectionRawMutex, MotorCommand> = Signal::new();

/// Elevation motor command
pub static EY_MOTOR_CMD: Signal<CriticalSectionRawMutex, MotorCommand> = Signal::new();

/// Latest dual-axis report for the monitor link
pub static REPORT: Signal<CriticalSectionRawMutex, MonitorReport> = Signal::new();

/// Latest dual-axis report for the status LEDs
pub static LED_REPORT: Signal<CriticalSectionRawMutex, MonitorReport> = Signal::new();

/// A ping arrived; the monitor TX task answers with a pong
pub static PONG_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();
