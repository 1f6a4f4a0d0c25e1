//! Bench-side mocks for the flight-controller telemetry link.
//!
//! Three pieces, usable separately:
//! - [`CommandTransmitter`] plays the flight-controller role: it frames
//!   commands and raw log payloads and writes them to any transport.
//! - [`BlockSource`] fabricates synthetic control-loop log blocks with a
//!   private, explicitly owned id counter.
//! - [`StreamServer`] plays the telemetry-node role: it accepts one client
//!   at a time and streams encoded log blocks, so the real client can be
//!   exercised without hardware.

pub mod error;
pub mod server;
pub mod source;
pub mod transmitter;

pub use error::{MockError, Result};
pub use server::StreamServer;
pub use source::{BlockIdCounter, BlockSource};
pub use transmitter::CommandTransmitter;
