//! Wire codecs for the flight-controller telemetry link.
//!
//! The link carries two byte formats, one per direction:
//! - **Command frames** (towards the node): a command byte, a single length
//!   byte, an XOR checksum byte, then the payload.
//! - **Log blocks** (from the node): a 9-byte header (type, timestamp, id)
//!   followed by a payload whose width is fixed per block type.
//!
//! Both codecs decode incrementally from a buffer — callers never deal with
//! partial reads.

pub mod block;
pub mod command;
pub mod error;
pub mod frame;
pub mod reader;
pub mod writer;

pub use block::{
    decode_block, encode_block, BlockHeader, BlockPayload, BlockType, ControlLoopData, LogBlock,
    BLOCK_HEADER_SIZE,
};
pub use command::Command;
pub use error::{Result, WireError};
pub use frame::{
    checksum, decode_frame, encode_frame, Frame, FRAME_HEADER_SIZE, MAX_FRAME_PAYLOAD,
};
pub use reader::{BlockReader, FrameReader};
pub use writer::{BlockWriter, FrameWriter};
