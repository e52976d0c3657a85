//! # Frame Guard Subsystem (CG-01)
//!
//! Authenticates monitored CAN frames before they reach the protected segment.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Codec, tag, freshness and translation logic, no I/O
//! - **Ports Layer** (`ports/`): The decision API and the bus abstraction
//! - **Service Layer** (`service.rs`): The relay loop wiring domain logic to ports
//! - **Adapters Layer** (`adapters/`): In-memory bus
//!
//! ## Security Notes
//!
//! - **Fail-Closed**: Any monitored frame that fails a check is dropped
//! - **Constant-Time Tags**: Tag comparison never exits early
//! - **Strict Freshness**: Counters must strictly increase; no wraparound window
//! - **Trust Boundary**: The tag is stripped when the translated frame is built;
//!   downstream consumers trust the relay, not the sender

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod shutdown;

// Re-export public API
pub use adapters::InMemoryBus;
pub use domain::codec::{
    decode_signed, encode_signed, encode_translated, SIGNED_FRAME_LEN, TRANSLATED_SPEED_OFFSET,
};
pub use domain::config::{GuardConfig, DEFAULT_MONITORED_ID, DEFAULT_RECEIVE_TIMEOUT};
pub use domain::entities::{AuthenticatedSpeed, FrameVerdict, RelayPhase, SignedSpeedFrame};
pub use domain::errors::{CodecError, FrameRejection, KeyError};
pub use domain::freshness::{is_fresh, record, RelayState};
pub use domain::secret::{SecretKey, DEMO_SECRET_KEY};
pub use domain::tag::{tag_message, Tag, TagVerifier, TAG_LEN};
pub use domain::translator::{release, translate};
pub use metrics::RelayStats;
pub use ports::inbound::FrameGuardApi;
pub use ports::outbound::BusPort;
pub use service::FrameGuardService;
pub use shutdown::ShutdownSignal;
