//! # Runtime Container
//!
//! Configuration and assembly of the relay from its parts.

pub mod config;

pub use config::{ConfigError, GuardianConfig};
