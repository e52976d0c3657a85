//! # Shared Types Crate
//!
//! Bus-level types shared by every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: Nothing here knows about SocketCAN or any other
//!   transport. Adapters convert to and from [`RawFrame`].
//! - **Classic CAN Only**: Payloads are at most [`MAX_PAYLOAD_LEN`] bytes;
//!   larger payloads cannot be represented.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
