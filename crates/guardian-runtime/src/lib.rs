//! # Guardian Runtime Library
//!
//! Wiring for the `can-guardian` binary: configuration, the SocketCAN
//! adapter, signal handling and the blocking relay task. Exposed as a library
//! so the pieces can be tested without real interfaces.

pub mod adapters;
pub mod container;
pub mod runtime;
pub mod signals;

pub use container::{ConfigError, GuardianConfig};
pub use runtime::{GuardianRuntime, RuntimeError};
pub use signals::spawn_signal_listener;
