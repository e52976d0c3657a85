//! # Error Types
//!
//! Errors raised while building frames or talking to a bus.

use thiserror::Error;

/// Errors from frame construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Payload exceeds the classic CAN limit of 8 bytes.
    #[error("Payload too long: {len} bytes (max 8)")]
    PayloadTooLong { len: usize },

    /// Identifier does not fit its 11-bit or 29-bit range.
    #[error("Invalid CAN identifier: 0x{raw:X}")]
    InvalidId { raw: u32 },
}

/// Errors reported by a bus port.
///
/// The cause is opaque to the relay; it only logs the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    /// The frame could not be transmitted.
    #[error("Transmit failed on {channel}: {reason}")]
    Transmit { channel: String, reason: String },

    /// Reading from the bus failed for a reason other than a timeout.
    #[error("Receive failed on {channel}: {reason}")]
    Receive { channel: String, reason: String },

    /// The interface could not be opened.
    #[error("Cannot open bus {channel}: {reason}")]
    Open { channel: String, reason: String },
}
