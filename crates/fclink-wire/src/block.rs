use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;

use crate::error::{Result, WireError};

/// Block header: type (1) + timestamp (4) + id (4) = 9 bytes, little-endian.
pub const BLOCK_HEADER_SIZE: usize = 9;

/// Log block type tags.
///
/// The set is closed: every tag maps to exactly one payload layout with a
/// statically known width. A tag outside this set is a framing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BlockType {
    /// Control-loop sensor sample.
    ControlLoop = 0,
}

impl BlockType {
    /// The wire encoding of this type tag.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Encoded payload width for this block type.
    pub const fn payload_size(self) -> usize {
        match self {
            BlockType::ControlLoop => 6,
        }
    }
}

impl TryFrom<u8> for BlockType {
    type Error = WireError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(BlockType::ControlLoop),
            other => Err(WireError::UnknownBlockType(other)),
        }
    }
}

/// Fixed-width prefix of every log block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockHeader {
    /// Selects the payload layout.
    pub block_type: BlockType,
    /// Producer-side timestamp, firmware ticks.
    pub timestamp: u32,
    /// Producer-assigned sequence id, monotonically increasing per source.
    ///
    /// An ordering and de-duplication hint for consumers; the decoder does
    /// not enforce it.
    pub id: u32,
}

/// Raw gyro axes sampled by the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlLoopData {
    pub raw_gyro_x: i16,
    pub raw_gyro_y: i16,
    pub raw_gyro_z: i16,
}

/// Type-tagged log block payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockPayload {
    ControlLoop(ControlLoopData),
}

impl BlockPayload {
    /// The type tag matching this payload's layout.
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockPayload::ControlLoop(_) => BlockType::ControlLoop,
        }
    }
}

/// A single decoded telemetry record: fixed header + typed payload.
///
/// Immutable once assembled; ownership moves from the decoder to the output
/// queue to whichever consumer drains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogBlock {
    pub header: BlockHeader,
    pub payload: BlockPayload,
}

impl LogBlock {
    /// The total wire size of this block (header + payload).
    pub fn wire_size(&self) -> usize {
        BLOCK_HEADER_SIZE + self.header.block_type.payload_size()
    }
}

/// Encode a log block into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬────────────────┬───────────┬───────────────────────┐
/// │ Type (1B) │ Timestamp (4B) │ Id (4B)   │ Payload               │
/// │           │ LE             │ LE        │ (fixed width by type) │
/// └───────────┴────────────────┴───────────┴───────────────────────┘
/// ```
pub fn encode_block(block: &LogBlock, dst: &mut BytesMut) {
    dst.reserve(block.wire_size());
    dst.put_u8(block.header.block_type.as_byte());
    dst.put_u32_le(block.header.timestamp);
    dst.put_u32_le(block.header.id);
    match &block.payload {
        BlockPayload::ControlLoop(data) => {
            dst.put_i16_le(data.raw_gyro_x);
            dst.put_i16_le(data.raw_gyro_y);
            dst.put_i16_le(data.raw_gyro_z);
        }
    }
}

/// Decode a log block from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete block yet.
/// On success, consumes the block bytes from the buffer. An unknown type tag
/// is an error — with a closed type set there is no trustworthy payload
/// width to skip, so callers must treat the stream as desynchronized.
pub fn decode_block(src: &mut BytesMut) -> Result<Option<LogBlock>> {
    if src.len() < BLOCK_HEADER_SIZE {
        return Ok(None); // Need more data
    }

    let block_type = BlockType::try_from(src[0])?;

    let total = BLOCK_HEADER_SIZE + block_type.payload_size();
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(1);
    let timestamp = src.get_u32_le();
    let id = src.get_u32_le();

    let payload = match block_type {
        BlockType::ControlLoop => BlockPayload::ControlLoop(ControlLoopData {
            raw_gyro_x: src.get_i16_le(),
            raw_gyro_y: src.get_i16_le(),
            raw_gyro_z: src.get_i16_le(),
        }),
    };

    Ok(Some(LogBlock {
        header: BlockHeader {
            block_type,
            timestamp,
            id,
        },
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block(id: u32) -> LogBlock {
        LogBlock {
            header: BlockHeader {
                block_type: BlockType::ControlLoop,
                timestamp: 0xDEAD_BEEF,
                id,
            },
            payload: BlockPayload::ControlLoop(ControlLoopData {
                raw_gyro_x: -1,
                raw_gyro_y: 512,
                raw_gyro_z: 0x7FFF,
            }),
        }
    }

    #[test]
    fn header_is_nine_bytes() {
        assert_eq!(BLOCK_HEADER_SIZE, 1 + 4 + 4);
        assert_eq!(sample_block(0).wire_size(), BLOCK_HEADER_SIZE + 6);
    }

    #[test]
    fn encode_layout_is_little_endian() {
        let block = LogBlock {
            header: BlockHeader {
                block_type: BlockType::ControlLoop,
                timestamp: 0x0403_0201,
                id: 0x0807_0605,
            },
            payload: BlockPayload::ControlLoop(ControlLoopData {
                raw_gyro_x: 0x1102,
                raw_gyro_y: -2,
                raw_gyro_z: 3,
            }),
        };

        let mut buf = BytesMut::new();
        encode_block(&block, &mut buf);

        assert_eq!(
            buf.as_ref(),
            &[
                0x00, // type
                0x01, 0x02, 0x03, 0x04, // timestamp LE
                0x05, 0x06, 0x07, 0x08, // id LE
                0x02, 0x11, // gyro x LE
                0xFE, 0xFF, // gyro y LE (-2)
                0x03, 0x00, // gyro z LE
            ]
        );
    }

    #[test]
    fn encode_decode_roundtrip() {
        let block = sample_block(42);
        let mut buf = BytesMut::new();
        encode_block(&block, &mut buf);

        let decoded = decode_block(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, block);
        assert!(buf.is_empty());
    }

    #[test]
    fn incomplete_header_needs_more_data() {
        let mut buf = BytesMut::from(&[0x00, 0x01, 0x02][..]);
        assert!(decode_block(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn incomplete_payload_needs_more_data() {
        let mut buf = BytesMut::new();
        encode_block(&sample_block(1), &mut buf);
        buf.truncate(BLOCK_HEADER_SIZE + 2);

        assert!(decode_block(&mut buf).unwrap().is_none());
    }

    #[test]
    fn unknown_type_tag_rejected() {
        let mut buf = BytesMut::from(&[0x7F, 0, 0, 0, 0, 0, 0, 0, 0][..]);
        let err = decode_block(&mut buf).unwrap_err();
        assert!(matches!(err, WireError::UnknownBlockType(0x7F)));
    }

    #[test]
    fn consecutive_blocks_decode_in_order() {
        let mut buf = BytesMut::new();
        for id in 0..5u32 {
            encode_block(&sample_block(id), &mut buf);
        }

        for id in 0..5u32 {
            let block = decode_block(&mut buf).unwrap().unwrap();
            assert_eq!(block.header.id, id);
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn payload_width_table() {
        assert_eq!(BlockType::ControlLoop.payload_size(), 6);
    }
}
