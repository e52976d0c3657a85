//! # Guardian Telemetry
//!
//! Logging setup for the CAN Guardian relay.
//!
//! Every decision the relay takes is emitted as a `tracing` event with
//! structured fields (`id`, `reason`, `counter`, ...). This crate installs the
//! subscriber that turns those events into either human-readable lines or one
//! JSON object per line for log shippers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guardian_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     tracing::info!("relay up");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CG_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `CG_JSON_LOGS` | `false` | One JSON object per log line |
//! | `CG_LOG_ANSI` | `true` | Colored output in pretty mode |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),
}

/// Install the global subscriber.
///
/// Returns a guard to be held for the lifetime of the process. Calling this
/// twice fails with `SubscriberInit`.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;
    Ok(TelemetryGuard { config })
}

/// Keeps telemetry active. Logs a final line when dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    config: TelemetryConfig,
}

impl TelemetryGuard {
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry");
    }
}

/// Emit an event about a single frame with the standard frame fields.
///
/// ```rust,ignore
/// log_frame_event!(trace, "RX", frame, channel = "vcan0");
/// ```
#[macro_export]
macro_rules! log_frame_event {
    ($level:ident, $msg:expr, $frame:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            id = %$frame.id,
            extended = $frame.id.is_extended(),
            len = $frame.len(),
            $($($field)*,)?
            $msg
        )
    };
}
