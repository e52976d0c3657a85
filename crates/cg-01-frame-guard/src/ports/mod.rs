//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: The per-frame decision API
//! - **Outbound (Driven)**: The bus the relay reads from and writes to

pub mod inbound;
pub mod outbound;
