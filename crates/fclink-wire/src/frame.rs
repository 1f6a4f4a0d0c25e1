use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::command::Command;
use crate::error::{Result, WireError};

/// Frame header: command (1) + length (1) + checksum (1) = 3 bytes.
pub const FRAME_HEADER_SIZE: usize = 3;

/// Maximum payload length representable in the single length byte.
pub const MAX_FRAME_PAYLOAD: usize = 255;

/// A single command frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The command this frame carries.
    pub command: Command,
    /// The frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// The XOR integrity byte covering command, length, and payload.
    pub fn checksum(&self) -> u8 {
        checksum(
            self.command.as_byte(),
            self.payload.len() as u8,
            &self.payload,
        )
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        FRAME_HEADER_SIZE + self.payload.len()
    }
}

/// XOR-fold of the command byte, length byte, and every payload byte.
///
/// A simple integrity check, not cryptographic.
pub fn checksum(command: u8, length: u8, payload: &[u8]) -> u8 {
    payload.iter().fold(command ^ length, |acc, byte| acc ^ byte)
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌─────────────┬────────────┬──────────────┬──────────────────┐
/// │ Command (1B)│ Length (1B)│ Checksum (1B)│ Payload          │
/// │             │ 0–255      │ XOR fold     │ (Length bytes)   │
/// └─────────────┴────────────┴──────────────┴──────────────────┘
/// ```
///
/// Payloads longer than [`MAX_FRAME_PAYLOAD`] are rejected, never truncated.
pub fn encode_frame(command: Command, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_FRAME_PAYLOAD,
        });
    }
    let length = payload.len() as u8;
    dst.reserve(FRAME_HEADER_SIZE + payload.len());
    dst.put_u8(command.as_byte());
    dst.put_u8(length);
    dst.put_u8(checksum(command.as_byte(), length, payload));
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer. The checksum is
/// verified; a mismatch is an error, not a silently accepted frame.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < FRAME_HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let command = Command::try_from(src[0])?;
    let length = src[1] as usize;
    let received = src[2];

    let total = FRAME_HEADER_SIZE + length;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let computed = checksum(src[0], src[1], &src[FRAME_HEADER_SIZE..total]);
    if received != computed {
        return Err(WireError::ChecksumMismatch { received, computed });
    }

    src.advance(FRAME_HEADER_SIZE);
    let payload = src.split_to(length).freeze();

    Ok(Some(Frame { command, payload }))
}
