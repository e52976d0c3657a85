//! # Bus Entities
//!
//! Identifiers and frames as seen by the relay, independent of the transport
//! that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FrameError;

/// Maximum payload length of a classic CAN data frame.
pub const MAX_PAYLOAD_LEN: usize = 8;

/// Largest 11-bit (standard) identifier.
pub const MAX_STANDARD_ID: u16 = 0x7FF;

/// Largest 29-bit (extended) identifier.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// A CAN arbitration identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanId {
    /// 11-bit identifier.
    Standard(u16),
    /// 29-bit identifier.
    Extended(u32),
}

impl CanId {
    /// Create a standard identifier, rejecting values above `0x7FF`.
    pub fn standard(raw: u16) -> Result<Self, FrameError> {
        if raw > MAX_STANDARD_ID {
            return Err(FrameError::InvalidId { raw: raw as u32 });
        }
        Ok(Self::Standard(raw))
    }

    /// Create an extended identifier, rejecting values above `0x1FFFFFFF`.
    pub fn extended(raw: u32) -> Result<Self, FrameError> {
        if raw > MAX_EXTENDED_ID {
            return Err(FrameError::InvalidId { raw });
        }
        Ok(Self::Extended(raw))
    }

    /// Numeric value of the identifier, regardless of its kind.
    pub fn raw(&self) -> u32 {
        match *self {
            Self::Standard(id) => id as u32,
            Self::Extended(id) => id,
        }
    }

    pub fn is_extended(&self) -> bool {
        matches!(self, Self::Extended(_))
    }
}

impl fmt::Display for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(id) => write!(f, "0x{:03X}", id),
            Self::Extended(id) => write!(f, "0x{:08X}", id),
        }
    }
}

/// A frame as received from, or handed to, a bus port.
///
/// The payload is stored inline; only the first `len` bytes are meaningful.
/// Remote (RTR) frames carry a DLC in `len` but no payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    /// Arbitration identifier.
    pub id: CanId,
    data: [u8; MAX_PAYLOAD_LEN],
    len: u8,
    #[serde(default)]
    rtr: bool,
}

impl RawFrame {
    /// Build a frame from an identifier and a payload of 0 to 8 bytes.
    pub fn new(id: CanId, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong { len: payload.len() });
        }
        let mut data = [0u8; MAX_PAYLOAD_LEN];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            data,
            len: payload.len() as u8,
            rtr: false,
        })
    }

    /// Build a full-length frame. Infallible since the size is fixed.
    pub fn full(id: CanId, data: [u8; MAX_PAYLOAD_LEN]) -> Self {
        Self {
            id,
            data,
            len: MAX_PAYLOAD_LEN as u8,
            rtr: false,
        }
    }

    /// Build a remote (RTR) frame requesting `dlc` bytes.
    pub fn remote(id: CanId, dlc: usize) -> Result<Self, FrameError> {
        if dlc > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong { len: dlc });
        }
        Ok(Self {
            id,
            data: [0u8; MAX_PAYLOAD_LEN],
            len: dlc as u8,
            rtr: true,
        })
    }

    /// The meaningful payload bytes. Always empty for a remote frame.
    pub fn payload(&self) -> &[u8] {
        if self.rtr {
            return &[];
        }
        &self.data[..self.len as usize]
    }

    /// Data length code: payload length, or the requested length for a
    /// remote frame.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_remote(&self) -> bool {
        self.rtr
    }
}
