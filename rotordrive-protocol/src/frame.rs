//! Frame delimiting and integrity
//!
//! - START (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (0-96)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-96 bytes): postcard-encoded message body
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes; sized for a full dual-axis report
pub const MAX_PAYLOAD_SIZE: usize = 96;

/// Maximum complete frame size on the wire
pub const MAX_FRAME_SIZE: usize = 1 + 1 + 1 + MAX_PAYLOAD_SIZE + 1;

/// Errors from frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds the maximum allowed size
    PayloadTooLarge,
    /// Declared length exceeds the maximum; parser resynchronizes
    InvalidLength,
    /// Checksum mismatch; frame discarded
    InvalidChecksum,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// One delimited message on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload bytes
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Build a frame around a payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut buf = Vec::new();
        buf.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            msg_type,
            payload: buf,
        })
    }

    /// Build a frame with an empty payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(length ^ msg_type, |acc, byte| acc ^ byte)
    }

    /// Encode into a buffer, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let total = 4 + self.payload.len();
        if buffer.len() < total {
            return Err(FrameError::BufferTooSmall);
        }
        let length = self.payload.len() as u8;
        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3..3 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[3 + self.payload.len()] = Self::checksum(length, self.msg_type, &self.payload);
        Ok(total)
    }
}

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Hunting for the start byte
    Sync,
    Length,
    Type,
    Payload,
    Checksum,
}

/// Incremental frame parser
///
/// Feed one byte at a time; any malformed input drops the partial frame
/// and the parser hunts for the next start byte.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    expected: u8,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Sync,
            expected: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    /// Consume one byte; returns a frame once one completes
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Sync => {
                if byte == FRAME_START {
                    self.state = ParseState::Length;
                }
                Ok(None)
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.state = ParseState::Sync;
                    return Err(FrameError::InvalidLength);
                }
                self.expected = byte;
                self.payload.clear();
                self.state = ParseState::Type;
                Ok(None)
            }
            ParseState::Type => {
                self.msg_type = byte;
                self.state = if self.expected == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
                Ok(None)
            }
            ParseState::Payload => {
                // Length was validated, push cannot fail.
                let _ = self.payload.push(byte);
                if self.payload.len() == self.expected as usize {
                    self.state = ParseState::Checksum;
                }
                Ok(None)
            }
            ParseState::Checksum => {
                self.state = ParseState::Sync;
                let expected = Frame::checksum(self.expected, self.msg_type, &self.payload);
                if byte != expected {
                    return Err(FrameError::InvalidChecksum);
                }
                Ok(Some(Frame {
                    msg_type: self.msg_type,
                    payload: self.payload.clone(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(parser: &mut FrameParser, bytes: &[u8]) -> std::vec::Vec<Frame> {
        let mut frames = std::vec::Vec::new();
        for &b in bytes {
            if let Ok(Some(frame)) = parser.feed(b) {
                frames.push(frame);
            }
        }
        frames
    }

    #[test]
    fn test_encode_then_parse() {
        let frame = Frame::new(0x01, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = frame.encode(&mut buf).unwrap();
        assert_eq!(len, 7);
        assert_eq!(buf[0], FRAME_START);

        let mut parser = FrameParser::new();
        let frames = parse_all(&mut parser, &buf[..len]);
        assert_eq!(frames, std::vec![frame]);
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = Frame::empty(0x05);
        let mut buf = [0u8; 8];
        let len = frame.encode(&mut buf).unwrap();
        assert_eq!(len, 4);

        let mut parser = FrameParser::new();
        let frames = parse_all(&mut parser, &buf[..len]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].msg_type, 0x05);
        assert!(frames[0].payload.is_empty());
    }

    #[test]
    fn test_resync_after_garbage() {
        let frame = Frame::new(0x02, &[9, 8]).unwrap();
        let mut buf = [0u8; 16];
        let len = frame.encode(&mut buf).unwrap();

        // Garbage before the frame must not prevent parsing it.
        let mut stream = std::vec![0x00, 0xFF, 0x13];
        stream.extend_from_slice(&buf[..len]);

        let mut parser = FrameParser::new();
        let frames = parse_all(&mut parser, &stream);
        assert_eq!(frames, std::vec![frame]);
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let frame = Frame::new(0x02, &[9, 8]).unwrap();
        let mut buf = [0u8; 16];
        let len = frame.encode(&mut buf).unwrap();
        buf[len - 1] ^= 0x40;

        let mut parser = FrameParser::new();
        let mut saw_error = false;
        for &b in &buf[..len] {
            match parser.feed(b) {
                Ok(Some(_)) => panic!("corrupted frame accepted"),
                Ok(None) => {}
                Err(FrameError::InvalidChecksum) => saw_error = true,
                Err(e) => panic!("unexpected error {:?}", e),
            }
        }
        assert!(saw_error);
    }

    #[test]
    fn test_oversized_length_resyncs() {
        let mut parser = FrameParser::new();
        assert_eq!(parser.feed(FRAME_START), Ok(None));
        assert_eq!(
            parser.feed(MAX_PAYLOAD_SIZE as u8 + 1),
            Err(FrameError::InvalidLength)
        );

        // Parser recovers on the next valid frame.
        let frame = Frame::new(0x03, &[7]).unwrap();
        let mut buf = [0u8; 8];
        let len = frame.encode(&mut buf).unwrap();
        let frames = parse_all(&mut parser, &buf[..len]);
        assert_eq!(frames, std::vec![frame]);
    }

    #[test]
    fn test_payload_at_size_limit() {
        let payload = [0xA5u8; MAX_PAYLOAD_SIZE];
        let frame = Frame::new(0x04, &payload).unwrap();
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = frame.encode(&mut buf).unwrap();

        let mut parser = FrameParser::new();
        let frames = parse_all(&mut parser, &buf[..len]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload.len(), MAX_PAYLOAD_SIZE);

        assert_eq!(
            Frame::new(0x04, &[0u8; MAX_PAYLOAD_SIZE + 1]),
            Err(FrameError::PayloadTooLarge)
        );
    }
}
