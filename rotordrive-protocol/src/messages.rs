//! Message types on the monitor/tracker link
//!
//! Tracker → controller: goto targets and maintenance commands.
//! Controller → monitor: periodic dual-axis state reports.

use rotordrive_core::control::{Axis, GotoValue};
use rotordrive_core::telemetry::RotorSnapshot;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: tracker -> controller
pub const MSG_GOTO: u8 = 0x01;
pub const MSG_RECALIBRATE: u8 = 0x02;
pub const MSG_CLEAR_FAULT: u8 = 0x03;
pub const MSG_HALT: u8 = 0x04;
pub const MSG_PING: u8 = 0x05;

// Message type IDs: controller -> monitor
pub const MSG_REPORT: u8 = 0x20;
pub const MSG_PONG: u8 = 0x21;

/// Errors above the frame layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Frame layer error
    Frame(FrameError),
    /// Message type byte not known to this side
    UnknownType(u8),
    /// Payload did not decode as the declared type
    Malformed,
}

impl From<FrameError> for ProtocolError {
    fn from(e: FrameError) -> Self {
        ProtocolError::Frame(e)
    }
}

/// Commands from the tracking side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerCommand {
    /// New target pair for the next control ticks
    Goto(GotoValue),
    /// Discard an axis's reference and recalibrate it
    Recalibrate(Axis),
    /// Clear a held fault on an axis
    ClearFault(Axis),
    /// Stop both axes at their current positions
    Halt,
    /// Link check; the controller answers with a pong
    Ping,
}

impl TrackerCommand {
    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, ProtocolError> {
        let mut buf = [0u8; MAX_PAYLOAD_SIZE];
        match self {
            TrackerCommand::Goto(goto) => {
                let used = postcard::to_slice(goto, &mut buf)
                    .map_err(|_| ProtocolError::Malformed)?;
                Ok(Frame::new(MSG_GOTO, used)?)
            }
            TrackerCommand::Recalibrate(axis) => {
                let used = postcard::to_slice(axis, &mut buf)
                    .map_err(|_| ProtocolError::Malformed)?;
                Ok(Frame::new(MSG_RECALIBRATE, used)?)
            }
            TrackerCommand::ClearFault(axis) => {
                let used = postcard::to_slice(axis, &mut buf)
                    .map_err(|_| ProtocolError::Malformed)?;
                Ok(Frame::new(MSG_CLEAR_FAULT, used)?)
            }
            TrackerCommand::Halt => Ok(Frame::empty(MSG_HALT)),
            TrackerCommand::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }

    /// Decode a parsed frame into a command
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        match frame.msg_type {
            MSG_GOTO => postcard::from_bytes(&frame.payload)
                .map(TrackerCommand::Goto)
                .map_err(|_| ProtocolError::Malformed),
            MSG_RECALIBRATE => postcard::from_bytes(&frame.payload)
                .map(TrackerCommand::Recalibrate)
                .map_err(|_| ProtocolError::Malformed),
            MSG_CLEAR_FAULT => postcard::from_bytes(&frame.payload)
                .map(TrackerCommand::ClearFault)
                .map_err(|_| ProtocolError::Malformed),
            MSG_HALT => Ok(TrackerCommand::Halt),
            MSG_PING => Ok(TrackerCommand::Ping),
            other => Err(ProtocolError::UnknownType(other)),
        }
    }
}

/// Periodic dual-axis state report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MonitorReport {
    /// Controller uptime in milliseconds
    pub uptime_ms: u32,
    /// Corrected-target count (forbidden zone / span clamps)
    pub range_violations: u32,
    pub azimuth: RotorSnapshot,
    pub elevation: RotorSnapshot,
}

impl MonitorReport {
    /// Encode this report into a frame
    pub fn to_frame(&self) -> Result<Frame, ProtocolError> {
        let mut buf = [0u8; MAX_PAYLOAD_SIZE];
        let used =
            postcard::to_slice(self, &mut buf).map_err(|_| ProtocolError::Malformed)?;
        Ok(Frame::new(MSG_REPORT, used)?)
    }

    /// Decode a parsed frame into a report
    pub fn from_frame(frame: &Frame) -> Result<Self, ProtocolError> {
        if frame.msg_type != MSG_REPORT {
            return Err(ProtocolError::UnknownType(frame.msg_type));
        }
        postcard::from_bytes(&frame.payload).map_err(|_| ProtocolError::Malformed)
    }
}

/// Link-check answer frame
pub fn pong_frame() -> Frame {
    Frame::empty(MSG_PONG)
}
