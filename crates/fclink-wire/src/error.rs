/// Errors that can occur while encoding or decoding link traffic.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The command byte is outside the defined command set.
    #[error("invalid command byte 0x{0:02x}")]
    InvalidCommand(u8),

    /// The payload does not fit the single-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The received checksum does not match the recomputed one.
    #[error("checksum mismatch (received 0x{received:02x}, computed 0x{computed:02x})")]
    ChecksumMismatch { received: u8, computed: u8 },

    /// The log block type tag is not part of the defined set.
    #[error("unknown log block type 0x{0:02x}")]
    UnknownBlockType(u8),

    /// An I/O error occurred while reading or writing.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame or block was received.
    #[error("connection closed (incomplete data)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
