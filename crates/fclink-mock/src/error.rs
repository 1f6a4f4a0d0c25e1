use std::net::SocketAddr;

use fclink_wire::WireError;

/// Errors that can occur in the bench mocks.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Failed to bind the stream server's listener.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// A wire-level encode or write error.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An I/O error outside the wire layer.
    #[error("mock I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MockError>;
