use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::thread;
use std::time::{Duration, Instant};

use fclink_wire::{BlockWriter, WireError};
use tracing::{debug, info};

use crate::error::{MockError, Result};
use crate::source::BlockSource;

/// Mock telemetry node: accepts one client at a time and streams synthetic
/// log blocks to it.
///
/// There is no session state to resume — a disconnected client that comes
/// back gets a fresh stream from whatever id the source is at.
pub struct StreamServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl StreamServer {
    /// Bind the listener. Port 0 picks a free port; see
    /// [`local_addr`](StreamServer::local_addr).
    pub fn bind(addr: SocketAddr) -> Result<Self> {
        let listener =
            TcpListener::bind(addr).map_err(|source| MockError::Bind { addr, source })?;
        let addr = listener.local_addr()?;
        info!(%addr, "stream server listening");
        Ok(Self { listener, addr })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Accept the next client and stream `count` blocks at `interval`.
    ///
    /// Timestamps count milliseconds since the session began, standing in
    /// for firmware ticks. Returns the number of blocks delivered; the
    /// client hanging up early ends the session without error.
    pub fn serve_one(
        &self,
        source: &mut BlockSource,
        count: u32,
        interval: Duration,
    ) -> Result<u32> {
        let (stream, peer) = self.listener.accept().map_err(MockError::Accept)?;
        info!(%peer, "client connected");

        let started = Instant::now();
        let mut writer = BlockWriter::new(stream);
        let mut sent = 0u32;

        for _ in 0..count {
            let block = source.next_block(started.elapsed().as_millis() as u32);
            match writer.write_block(&block) {
                Ok(()) => sent += 1,
                Err(WireError::ConnectionClosed) => {
                    info!(sent, "client disconnected");
                    return Ok(sent);
                }
                Err(WireError::Io(err)) if is_disconnect(&err) => {
                    info!(sent, "client disconnected");
                    return Ok(sent);
                }
                Err(err) => return Err(err.into()),
            }
            if !interval.is_zero() {
                thread::sleep(interval);
            }
        }

        debug!(sent, "stream complete");
        Ok(sent)
    }
}

fn is_disconnect(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
