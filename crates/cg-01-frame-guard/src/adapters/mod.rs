//! # Adapters Layer
//!
//! Implementations of the outbound ports that live inside this crate.
//! The SocketCAN adapter lives in the runtime crate.

pub mod memory;

pub use memory::InMemoryBus;
