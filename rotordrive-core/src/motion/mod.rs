//! Position feedback and speed profile
//!
//! The feedback side turns direction-aware pulse counts into normalized
//! degrees; the speed side turns a position error back into a drive
//! magnitude. Both are pure state machines over control-tick snapshots.

mod feedback;
mod speed;

pub use feedback::PulseFeedback;
pub use speed::{DriveCommand, SpeedProfile};
