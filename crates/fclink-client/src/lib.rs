//! Telemetry client for the flight-controller link.
//!
//! Runs a background worker that connects to the telemetry node over TCP
//! (retrying forever at a fixed interval), decodes the upstream log-block
//! stream, and pushes records onto a thread-safe output queue that any
//! number of consumers can drain without blocking.
//!
//! All link failures are handled inside the worker: a short read, a decode
//! error, or a checksum mismatch drops the socket and re-enters the
//! connect-retry loop. Nothing propagates to callers; the only caller-visible
//! signal of trouble is an empty queue and the [`LinkStats`] counters.

pub mod client;
pub mod connection;
pub mod error;
mod throughput;

pub use client::{ClientConfig, LinkStats, TelemetryClient};
pub use connection::ConnectionManager;
pub use error::{ClientError, Result};
