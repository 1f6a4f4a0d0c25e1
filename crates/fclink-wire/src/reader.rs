use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::block::{decode_block, LogBlock};
use crate::error::{Result, WireError};
use crate::frame::{decode_frame, Frame};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete log blocks from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete blocks.
/// A read timeout on the underlying stream surfaces as `WireError::Io` with
/// kind `WouldBlock`/`TimedOut`; buffered partial bytes are kept, so the
/// next call resumes mid-block.
pub struct BlockReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: Read> BlockReader<R> {
    /// Create a new block reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Read the next complete log block (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_block(&mut self) -> Result<LogBlock> {
        loop {
            if let Some(block) = decode_block(&mut self.buf)? {
                trace!(id = block.header.id, ty = ?block.header.block_type, "decoded log block");
                return Ok(block);
            }

            self.fill_buf()?;
        }
    }

    fn fill_buf(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = match self.inner.read(&mut chunk) {
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => return Ok(()),
            Err(err) => return Err(WireError::Io(err)),
        };

        if read == 0 {
            return Err(WireError::ConnectionClosed);
        }

        self.buf.extend_from_slice(&chunk[..read]);
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Reads complete command frames from any `Read` stream.
///
/// The firmware-side counterpart of [`BlockReader`]: used by the mock node
/// and tests to decode what a transmitter sends.
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: Read> FrameReader<R> {
    /// Create a new frame reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf)? {
                trace!(command = %frame.command, len = frame.payload.len(), "decoded frame");
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
