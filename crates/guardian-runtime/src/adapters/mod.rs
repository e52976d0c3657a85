//! # Adapters
//!
//! Bus adapters backed by real interfaces.

#[cfg(feature = "socketcan")]
pub mod socketcan_bus;

#[cfg(feature = "socketcan")]
pub use socketcan_bus::SocketCanBus;
