//! Status LED task
//!
//! One RGB LED per axis: red for a held fault, yellow while
//! calibrating, blue while moving, green when calibrated and on
//! target.

use defmt::*;
use embassy_rp::gpio::Output;

use rotordrive_core::telemetry::RotorSnapshot;

use crate::channels::LED_REPORT;

/// RGB outputs for one axis
pub struct AxisLeds {
    pub red: Output<'static>,
    pub green: Output<'static>,
    pub blue: Output<'static>,
}

impl AxisLeds {
    fn show(&mut self, snapshot: &RotorSnapshot) {
        let (r, g, b) = if snapshot.fault.is_some() {
            (true, false, false)
        } else if !snapshot.calibrated {
            (true, true, false)
        } else if snapshot.pwm > 0 {
            (false, false, true)
        } else {
            (false, true, false)
        };
        self.red.set_level(r.into());
        self.green.set_level(g.into());
        self.blue.set_level(b.into());
    }
}

/// Status LED task for both axes
#[embassy_executor::task]
pub async fn status_led_task(mut azimuth: AxisLeds, mut elevation: AxisLeds) {
    info!("Status LED task started");

    loop {
        let report = LED_REPORT.wait().await;
        azimuth.show(&report.azimuth);
        elevation.show(&report.elevation);
    }
}
