//! # Guardian Configuration
//!
//! Runtime parameters for the relay, loaded from the environment.
//!
//! ## Security Requirements
//!
//! - `secret_key` SHOULD NOT be the demo key outside a lab; running with it is
//!   allowed but logged as a warning at startup
//! - The key is never logged, and its hex form is wiped after decoding

use std::env;
use std::time::Duration;

use cg_01_frame_guard::{GuardConfig, KeyError, SecretKey};
use shared_types::MAX_STANDARD_ID;
use thiserror::Error;
use zeroize::Zeroizing;

pub const ENV_SECRET_KEY: &str = "CG_SECRET_KEY";
pub const ENV_MONITORED_ID: &str = "CG_MONITORED_ID";
pub const ENV_INGRESS_CHANNEL: &str = "CG_INGRESS_CHANNEL";
pub const ENV_EGRESS_CHANNEL: &str = "CG_EGRESS_CHANNEL";
pub const ENV_RECV_TIMEOUT_MS: &str = "CG_RECV_TIMEOUT_MS";

/// Complete relay configuration.
#[derive(Debug, Clone)]
pub struct GuardianConfig {
    /// Shared authentication key.
    pub secret_key: SecretKey,
    /// Identifier of the monitored speed frame.
    pub monitored_id: u16,
    /// Untrusted segment the relay reads from.
    pub ingress_channel: String,
    /// Protected segment the relay writes to.
    pub egress_channel: String,
    /// Upper bound on a single blocking receive.
    pub receive_timeout: Duration,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        let guard = GuardConfig::default();
        Self {
            secret_key: SecretKey::demo(),
            monitored_id: guard.monitored_id,
            ingress_channel: "vcan0".to_string(),
            egress_channel: "vcan1".to_string(),
            receive_timeout: guard.receive_timeout,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not valid hex: {reason}")]
    InvalidHex { var: &'static str, reason: String },

    #[error("{var}: cannot parse '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("secret key is empty")]
    EmptyKey,

    #[error("secret key rejected: {0}")]
    Key(#[from] KeyError),

    #[error("receive timeout must be greater than zero")]
    ZeroTimeout,

    #[error("monitored id 0x{id:X} is outside the 11-bit range (max 0x{max:X})", max = MAX_STANDARD_ID)]
    MonitoredIdOutOfRange { id: u16 },

    #[error("{var} must name a bus interface")]
    EmptyChannel { var: &'static str },
}

impl GuardianConfig {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Environment Variables
    ///
    /// - `CG_SECRET_KEY`: Shared key, hex (default: demo key)
    /// - `CG_MONITORED_ID`: Monitored id, hex with or without `0x` (default: 0x244)
    /// - `CG_INGRESS_CHANNEL`: Ingress interface (default: vcan0)
    /// - `CG_EGRESS_CHANNEL`: Egress interface (default: vcan1)
    /// - `CG_RECV_TIMEOUT_MS`: Receive timeout in milliseconds (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secret_hex) = lookup(ENV_SECRET_KEY).map(Zeroizing::new) {
            let bytes = hex::decode(secret_hex.trim()).map_err(|e| ConfigError::InvalidHex {
                var: ENV_SECRET_KEY,
                reason: e.to_string(),
            })?;
            if bytes.is_empty() {
                return Err(ConfigError::EmptyKey);
            }
            config.secret_key = SecretKey::new(bytes)?;
        }

        if let Some(raw) = lookup(ENV_MONITORED_ID) {
            config.monitored_id = parse_hex_id(&raw)?;
        }

        if let Some(channel) = lookup(ENV_INGRESS_CHANNEL) {
            config.ingress_channel = channel.trim().to_string();
        }
        if let Some(channel) = lookup(ENV_EGRESS_CHANNEL) {
            config.egress_channel = channel.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_RECV_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: ENV_RECV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            config.receive_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.receive_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.monitored_id > MAX_STANDARD_ID {
            return Err(ConfigError::MonitoredIdOutOfRange {
                id: self.monitored_id,
            });
        }
        if self.ingress_channel.is_empty() {
            return Err(ConfigError::EmptyChannel {
                var: ENV_INGRESS_CHANNEL,
            });
        }
        if self.egress_channel.is_empty() {
            return Err(ConfigError::EmptyChannel {
                var: ENV_EGRESS_CHANNEL,
            });
        }
        Ok(())
    }

    /// Whether the relay would run with the publicly known demo key.
    pub fn uses_demo_key(&self) -> bool {
        self.secret_key.is_demo_key()
    }

    /// The part of the configuration the frame guard itself needs.
    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            monitored_id: self.monitored_id,
            receive_timeout: self.receive_timeout,
        }
    }
}

fn parse_hex_id(raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidNumber {
        var: ENV_MONITORED_ID,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<GuardianConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GuardianConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.uses_demo_key());
        assert_eq!(config.monitored_id, 0x244);
        assert_eq!(config.ingress_channel, "vcan0");
        assert_eq!(config.egress_channel, "vcan1");
        assert_eq!(config.receive_timeout, Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (ENV_SECRET_KEY, "00112233445566778899aabbccddeeff"),
            (ENV_MONITORED_ID, "0x1A0"),
            (ENV_INGRESS_CHANNEL, "can0"),
            (ENV_EGRESS_CHANNEL, " can1 "),
            (ENV_RECV_TIMEOUT_MS, "250"),
        ])
        .unwrap();

        assert!(!config.uses_demo_key());
        assert_eq!(config.secret_key.len(), 16);
        assert_eq!(config.monitored_id, 0x1A0);
        assert_eq!(config.ingress_channel, "can0");
        assert_eq!(config.egress_channel, "can1");
        assert_eq!(config.receive_timeout, Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_demo_key_given_as_hex_is_recognized() {
        let config = load(&[(ENV_SECRET_KEY, &hex::encode(b"super_secret_demo_key"))]).unwrap();
        assert!(config.uses_demo_key());
    }

    #[test]
    fn test_monitored_id_without_prefix() {
        let config = load(&[(ENV_MONITORED_ID, "244")]).unwrap();
        assert_eq!(config.monitored_id, 0x244);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            load(&[(ENV_SECRET_KEY, "not-hex")]),
            Err(ConfigError::InvalidHex { .. })
        ));
        assert!(matches!(
            load(&[(ENV_SECRET_KEY, "")]),
            Err(ConfigError::EmptyKey)
        ));
        assert!(matches!(
            load(&[(ENV_MONITORED_ID, "0xZZ")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            load(&[(ENV_MONITORED_ID, "0x10244")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            load(&[(ENV_RECV_TIMEOUT_MS, "-5")]),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_validation_errors() {
        let config = load(&[(ENV_RECV_TIMEOUT_MS, "0")]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));

        let config = load(&[(ENV_MONITORED_ID, "0x800")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MonitoredIdOutOfRange { id: 0x800 })
        ));

        let config = load(&[(ENV_EGRESS_CHANNEL, "  ")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyChannel { .. })
        ));
    }

    #[test]
    fn test_guard_config_mirrors_fields() {
        let config = load(&[(ENV_MONITORED_ID, "7FF"), (ENV_RECV_TIMEOUT_MS, "5")]).unwrap();
        let guard = config.guard_config();
        assert_eq!(guard.monitored_id, 0x7FF);
        assert_eq!(guard.receive_timeout, Duration::from_millis(5));
    }
}
