use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use fclink_wire::BlockReader;
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Owns the single outbound socket to the telemetry node.
///
/// One connection at a time: `connect` fully replaces any prior socket, and
/// any partially read block dies with it. No other component may touch the
/// stream — the decoder worker reads exclusively through [`reader`].
///
/// [`reader`]: ConnectionManager::reader
pub struct ConnectionManager {
    addr: SocketAddr,
    read_timeout: Option<Duration>,
    reader: Option<BlockReader<TcpStream>>,
}

impl ConnectionManager {
    /// Create a manager for the given node address.
    ///
    /// `read_timeout` is applied to every new connection so that blocking
    /// reads wake up periodically and the worker can observe its stop flag.
    pub fn new(addr: SocketAddr, read_timeout: Option<Duration>) -> Self {
        Self {
            addr,
            read_timeout,
            reader: None,
        }
    }

    /// The node address this manager connects to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Whether a connection is currently held.
    pub fn is_connected(&self) -> bool {
        self.reader.is_some()
    }

    /// The reader over the current connection, if any.
    pub fn reader(&mut self) -> Option<&mut BlockReader<TcpStream>> {
        self.reader.as_mut()
    }

    /// Establish a fresh connection, replacing any existing one.
    pub fn connect(&mut self) -> Result<()> {
        self.disconnect();

        let stream = TcpStream::connect(self.addr).map_err(|source| ClientError::Connect {
            addr: self.addr,
            source,
        })?;
        stream.set_read_timeout(self.read_timeout)?;

        info!(addr = %self.addr, "connected to telemetry node");
        self.reader = Some(BlockReader::new(stream));
        Ok(())
    }

    /// Drop the current connection, if any.
    pub fn disconnect(&mut self) {
        if self.reader.take().is_some() {
            debug!(addr = %self.addr, "dropped connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connect_failure_is_reported_not_panicked() {
        // Bind then drop to obtain a port with (very likely) no listener.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut conn = ConnectionManager::new(addr, None);
        let err = conn.connect().unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }));
        assert!(!conn.is_connected());
    }

    #[test]
    fn connect_replaces_prior_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut conn = ConnectionManager::new(addr, Some(Duration::from_millis(50)));
        conn.connect().unwrap();
        assert!(conn.is_connected());

        conn.connect().unwrap();
        assert!(conn.is_connected());

        conn.disconnect();
        assert!(!conn.is_connected());
        assert!(conn.reader().is_none());
    }
}
