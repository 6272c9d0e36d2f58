//! Pulse counting tasks
//!
//! One task per axis waits on the feedback pin and counts edges into
//! the shared atomic, signed by the direction flag current at that
//! edge. A direction change therefore takes effect at the next edge,
//! never retroactively, and no count is lost across it.

use defmt::*;
use embassy_rp::gpio::Input;
use portable_atomic::{AtomicBool, AtomicI32, Ordering};

/// Edge-counting task for one axis
#[embassy_executor::task(pool_size = 2)]
pub async fn pulse_task(
    mut pin: Input<'static>,
    pulses: &'static AtomicI32,
    clockwise: &'static AtomicBool,
) {
    info!("Pulse task started");

    loop {
        pin.wait_for_rising_edge().await;
        let delta = if clockwise.load(Ordering::Relaxed) {
            1
        } else {
            -1
        };
        pulses.fetch_add(delta, Ordering::Relaxed);
    }
}
