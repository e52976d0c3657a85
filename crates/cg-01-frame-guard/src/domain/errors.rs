//! # Frame Guard Errors
//!
//! Every rejection the relay can produce. None of these is fatal: the relay
//! drops the frame, logs the error and keeps reading.

use shared_types::CanId;
use thiserror::Error;

/// Errors from decoding a monitored payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Payload length is not the fixed signed-frame length.
    #[error("Invalid payload length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors from key construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// A zero-length key authenticates nothing.
    #[error("Secret key must not be empty")]
    Empty,

    /// The MAC implementation refused the key.
    #[error("Secret key rejected by MAC: {0}")]
    Rejected(String),
}

/// Why a monitored frame was dropped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameRejection {
    /// Payload length is not 8.
    #[error("Malformed frame {id}: {len} byte payload")]
    MalformedFrame { id: CanId, len: usize },

    /// Received tag does not match the recomputed tag.
    #[error("Authentication failure {id}: bad tag (speed100={speed100} counter={counter})")]
    AuthenticationFailure {
        id: CanId,
        speed100: u16,
        counter: u16,
    },

    /// Counter is not greater than the last accepted counter.
    #[error("Stale or replayed frame {id}: counter={counter} last={last}")]
    StaleOrReplayed {
        id: CanId,
        speed100: u16,
        counter: u16,
        last: u16,
    },
}

impl FrameRejection {
    /// Short machine-readable reason, used as a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedFrame { .. } => "malformed",
            Self::AuthenticationFailure { .. } => "bad_tag",
            Self::StaleOrReplayed { .. } => "stale_counter",
        }
    }

    /// A tag mismatch means someone without the key is talking on the bus.
    pub fn is_security_relevant(&self) -> bool {
        matches!(self, Self::AuthenticationFailure { .. })
    }
}
