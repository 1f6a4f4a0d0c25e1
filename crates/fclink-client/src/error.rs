use std::net::SocketAddr;

use fclink_wire::WireError;

/// Errors surfaced by the telemetry client's public operations.
///
/// Link-level failures (I/O, decode, checksum) never appear here — the
/// worker handles them internally via the reconnect loop.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// `start` was called while the worker is already running.
    #[error("telemetry client is already running")]
    AlreadyRunning,

    /// Failed to connect to the telemetry node.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// A wire-level decode error.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An I/O error outside the managed connection (e.g. thread spawn).
    #[error("client I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
