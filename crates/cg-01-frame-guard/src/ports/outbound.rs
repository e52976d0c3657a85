//! # Outbound Ports (Driven Ports / SPI)
//!
//! The bus abstraction the relay loop runs against.

use std::time::Duration;

use shared_types::{BusError, RawFrame};

/// A physical or virtual bus segment.
///
/// Both operations block. `receive` must return within roughly `timeout`
/// so that the relay loop can observe shutdown requests.
pub trait BusPort: Send {
    /// Name of the underlying channel, for logs.
    fn channel(&self) -> &str;

    /// Wait up to `timeout` for the next frame.
    ///
    /// `Ok(None)` means the wait elapsed with no traffic.
    fn receive(&mut self, timeout: Duration) -> Result<Option<RawFrame>, BusError>;

    /// Best-effort transmit. No retry is expected from the caller.
    fn send(&mut self, frame: &RawFrame) -> Result<(), BusError>;
}
