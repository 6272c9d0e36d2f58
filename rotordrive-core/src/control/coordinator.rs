//! Dual-axis goto coordination
//!
//! Runs once per tracking update, not per control tick: resolves the
//! tracker's azimuth onto the rotor's continuous range (east/west pass
//! semantics, forbidden zone) and clamps the elevation, then hands each
//! axis its target. The axes never read each other's state; this is the
//! only place the pair is considered together.

use crate::angle::{resolve_azimuth_branch, AzimuthRange, Millideg};
use crate::config::{Span, SystemConfig};
use crate::control::Rotor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One tracking update from the tracker
///
/// Consumed and discarded per update; a newer value simply overwrites
/// the previous targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GotoValue {
    /// Azimuth (or X) target in millidegrees
    pub ax: Millideg,
    /// Elevation (or Y) target in millidegrees
    pub ey: Millideg,
    /// The pass runs east of the observer
    pub east_pass: bool,
    /// `east_pass` carries meaning for this update
    pub east_pass_info: bool,
}

/// Pre-processor applying pair semantics to incoming targets
pub struct Coordinator {
    azimuth_range: AzimuthRange,
    elevation_span: Option<Span>,
    use_east_west: bool,
    violations: u32,
}

impl Coordinator {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            azimuth_range: cfg.azimuth_range,
            elevation_span: cfg.elevation_span,
            use_east_west: cfg.use_east_west,
            violations: 0,
        }
    }

    /// Resolve one tracking update into both axes' targets
    pub fn apply(&mut self, goto: &GotoValue, azimuth: &mut Rotor, elevation: &mut Rotor) {
        let pass_info_valid = self.use_east_west && goto.east_pass_info;
        let resolved = resolve_azimuth_branch(
            goto.ax,
            azimuth.extended_position(),
            goto.east_pass,
            pass_info_valid,
            self.azimuth_range,
        );
        if resolved.violation {
            self.violations = self.violations.saturating_add(1);
        }
        azimuth.set_target(resolved.command);

        let ey = match self.elevation_span {
            Some(span) => {
                let (clamped, out_of_range) = span.clamp(goto.ey);
                if out_of_range {
                    self.violations = self.violations.saturating_add(1);
                }
                clamped
            }
            None => goto.ey,
        };
        elevation.set_target(ey);
    }

    /// Targets corrected away from the forbidden zone or span so far
    pub fn range_violations(&self) -> u32 {
        self.violations
    }
}
