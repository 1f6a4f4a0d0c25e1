//! Bench tools for a flight-controller telemetry link.
//!
//! Two endpoints of a framed, checksummed byte protocol over TCP, plus the
//! mocks to drive them:
//!
//! - [`wire`] — command-frame and log-block codecs with incremental
//!   reader/writer types
//! - [`client`] — background telemetry client with connect-retry, stream
//!   decoding, and a thread-safe output queue
//! - [`mock`] — command transmitter, synthetic block source, and a stream
//!   server standing in for the telemetry node

/// Re-export wire codec types.
pub mod wire {
    pub use fclink_wire::*;
}

/// Re-export telemetry client types.
pub mod client {
    pub use fclink_client::*;
}

/// Re-export bench mock types.
pub mod mock {
    pub use fclink_mock::*;
}
