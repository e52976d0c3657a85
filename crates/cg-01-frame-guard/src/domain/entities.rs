//! # Domain Entities
//!
//! Core data structures for the relay's per-frame decision.

use shared_types::RawFrame;

use super::errors::FrameRejection;
use super::tag::Tag;

/// A decoded monitored payload.
///
/// Exists only between decode and the forward/drop decision; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedSpeedFrame {
    /// Speed in hundredths of km/h.
    pub speed100: u16,
    /// Sender-assigned sequence number.
    pub counter: u16,
    /// Truncated HMAC-SHA256 over `speed100 || counter`.
    pub tag: Tag,
}

impl SignedSpeedFrame {
    /// Speed in km/h, for log output.
    pub fn speed_kph(&self) -> f64 {
        f64::from(self.speed100) / 100.0
    }
}

/// A speed value that has passed both the tag and the freshness check.
///
/// Only the relay service can construct one, so anything holding an
/// `AuthenticatedSpeed` is on the accept path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedSpeed {
    speed100: u16,
    counter: u16,
}

impl AuthenticatedSpeed {
    pub(crate) fn new(frame: &SignedSpeedFrame) -> Self {
        Self {
            speed100: frame.speed100,
            counter: frame.counter,
        }
    }

    pub fn speed100(&self) -> u16 {
        self.speed100
    }

    pub fn counter(&self) -> u16 {
        self.counter
    }

    pub fn speed_kph(&self) -> f64 {
        f64::from(self.speed100) / 100.0
    }
}

/// Outcome of processing one ingress frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameVerdict {
    /// Non-monitored frame, to be forwarded byte-identical.
    Passthrough(RawFrame),
    /// Monitored frame accepted; `frame` is the translated output.
    Forward {
        frame: RawFrame,
        speed: AuthenticatedSpeed,
    },
    /// Monitored frame rejected.
    Drop(FrameRejection),
}

/// Relay loop phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayPhase {
    Running,
    /// Terminal: no further reads or writes.
    ShuttingDown,
}
