//! # Domain Layer
//!
//! Pure frame logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod codec;
pub mod config;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod secret;
pub mod tag;
pub mod translator;
