use std::io::Write;
use std::thread;
use std::time::Duration;

use fclink_wire::{Command, FrameWriter};
use tracing::debug;

use crate::error::Result;

/// Plays the flight-controller side of the link: frames commands and raw
/// log payloads and writes them synchronously to the transport.
///
/// No acknowledgement is awaited; the node either acts on a frame or drops
/// it.
pub struct CommandTransmitter<W> {
    writer: FrameWriter<W>,
}

impl<W: Write> CommandTransmitter<W> {
    /// Create a transmitter over any writable transport.
    pub fn new(inner: W) -> Self {
        Self {
            writer: FrameWriter::new(inner),
        }
    }

    /// Tell the node to begin streaming log blocks upstream.
    pub fn start_stream(&mut self) -> Result<()> {
        self.send(Command::StartStream, b"")
    }

    /// Tell the node to stop streaming log blocks.
    pub fn stop_stream(&mut self) -> Result<()> {
        self.send(Command::StopStream, b"")
    }

    /// Tell the node to begin persisting log data to local storage.
    pub fn start_persist(&mut self) -> Result<()> {
        self.send(Command::StartPersist, b"")
    }

    /// Tell the node to stop persisting log data.
    pub fn stop_persist(&mut self) -> Result<()> {
        self.send(Command::StopPersist, b"")
    }

    /// Carry one raw log payload to the node.
    ///
    /// Payloads longer than the length byte allows are rejected, not
    /// truncated.
    pub fn send_data(&mut self, payload: &[u8]) -> Result<()> {
        self.send(Command::SendData, payload)
    }

    /// Load test: send `count` data frames with a fixed payload, pausing
    /// `interval` between consecutive frames.
    pub fn send_burst(&mut self, count: usize, payload: &[u8], interval: Duration) -> Result<()> {
        debug!(count, len = payload.len(), "sending frame burst");
        for i in 0..count {
            self.send_data(payload)?;
            if i + 1 < count && !interval.is_zero() {
                thread::sleep(interval);
            }
        }
        Ok(())
    }

    fn send(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        debug!(command = %command, len = payload.len(), "TX frame");
        self.writer.send(command, payload)?;
        Ok(())
    }

    /// Consume the transmitter and return the transport.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
