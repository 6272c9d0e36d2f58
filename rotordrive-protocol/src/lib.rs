//! Monitor/tracker UART protocol
//!
//! Defines the binary link between the rotor controller and whatever
//! drives it (a tracking program) or watches it (a monitor). The
//! controller never parses command text; both directions carry small
//! framed messages:
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–96B       │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Payloads are postcard-encoded; the frame layer only guarantees
//! delimiting and integrity, so the parser resynchronizes on the next
//! start byte after any corruption.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{MonitorReport, ProtocolError, TrackerCommand};
