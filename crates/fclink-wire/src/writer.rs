use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::block::{encode_block, LogBlock};
use crate::command::Command;
use crate::error::{Result, WireError};
use crate::frame::{encode_frame, Frame};

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes complete command frames to any `Write` stream.
///
/// Writes are synchronous and unacknowledged; the frame is flushed before
/// returning.
pub struct FrameWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> FrameWriter<W> {
    /// Create a new frame writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.command, frame.payload.as_ref())
    }

    /// Encode and send a command with a payload.
    ///
    /// Payloads longer than the length byte allows are rejected before
    /// anything reaches the wire.
    pub fn send(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(command, payload, &mut self.buf)?;
        write_all(&mut self.inner, &self.buf)?;
        flush(&mut self.inner)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Writes complete log blocks to any `Write` stream.
///
/// The node-side counterpart of [`FrameWriter`]: used by the bench server to
/// feed a client.
pub struct BlockWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> BlockWriter<W> {
    /// Create a new block writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode and write a log block (blocking).
    pub fn write_block(&mut self, block: &LogBlock) -> Result<()> {
        self.buf.clear();
        encode_block(block, &mut self.buf);
        write_all(&mut self.inner, &self.buf)?;
        flush(&mut self.inner)
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn write_all<W: Write>(inner: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match inner.write(&buf[offset..]) {
            Ok(0) => return Err(WireError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(WireError::Io(err)),
        }
    }
    Ok(())
}

fn flush<W: Write>(inner: &mut W) -> Result<()> {
    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(WireError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::block::{BlockHeader, BlockPayload, BlockType, ControlLoopData};
    use crate::frame::{decode_frame, MAX_FRAME_PAYLOAD};
    use crate::reader::BlockReader;

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.send(Command::SendData, b"AB").unwrap();

        let wire = writer.into_inner().into_inner();
        assert_eq!(wire, vec![0x02, 0x02, 0x03, 0x41, 0x42]);
    }

    #[test]
    fn write_frame_method() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let frame = Frame::new(Command::StartPersist, "abc");

        writer.write_frame(&frame).unwrap();

        let mut wire = BytesMut::from(writer.into_inner().into_inner().as_slice());
        let decoded = decode_frame(&mut wire).unwrap().unwrap();
        assert_eq!(decoded.command, Command::StartPersist);
        assert_eq!(decoded.payload.as_ref(), b"abc");
    }

    #[test]
    fn oversized_payload_rejected_before_write() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let payload = vec![0u8; MAX_FRAME_PAYLOAD + 1];

        let err = writer.send(Command::SendData, &payload).unwrap_err();
        assert!(matches!(err, WireError::PayloadTooLarge { .. }));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(Command::StartStream, b"").unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_retries() {
        let sink = InterruptedOnceWriter {
            interrupted: false,
            data: Vec::new(),
        };
        let mut writer = FrameWriter::new(sink);

        writer.send(Command::SendData, b"retry").unwrap();
        assert!(!writer.into_inner().data.is_empty());
    }

    #[test]
    fn block_writer_feeds_block_reader() {
        let block = LogBlock {
            header: BlockHeader {
                block_type: BlockType::ControlLoop,
                timestamp: 77,
                id: 6,
            },
            payload: BlockPayload::ControlLoop(ControlLoopData {
                raw_gyro_x: 10,
                raw_gyro_y: 20,
                raw_gyro_z: 30,
            }),
        };

        let mut writer = BlockWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_block(&block).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = BlockReader::new(Cursor::new(wire));
        assert_eq!(reader.read_block().unwrap(), block);
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct InterruptedOnceWriter {
        interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedOnceWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
