//! # Frame Guard Configuration
//!
//! Static parameters of one relay instance. The shared key is kept apart in
//! [`SecretKey`](super::secret::SecretKey) so that this struct can be freely
//! logged.

use std::time::Duration;

use shared_types::CanId;

/// Default monitored identifier (vehicle speed).
pub const DEFAULT_MONITORED_ID: u16 = 0x244;

/// Default bounded wait for one ingress receive.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Relay parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Numeric identifier of the monitored frame.
    ///
    /// Matched against the raw identifier value regardless of whether the
    /// ingress frame is standard or extended, so an extended frame cannot
    /// sneak the monitored value past the checks.
    pub monitored_id: u16,
    /// Bounded wait for each ingress receive. Also the shutdown latency.
    pub receive_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            monitored_id: DEFAULT_MONITORED_ID,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

impl GuardConfig {
    /// Whether `id` is subject to authentication.
    pub fn is_monitored(&self, id: CanId) -> bool {
        id.raw() == u32::from(self.monitored_id)
    }

    /// Identifier of translated output frames: always a standard id,
    /// whatever kind the accepted ingress frame had.
    pub fn output_id(&self) -> CanId {
        CanId::Standard(self.monitored_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GuardConfig::default();
        assert_eq!(config.monitored_id, 0x244);
        assert_eq!(config.receive_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_is_monitored_matches_both_id_kinds() {
        let config = GuardConfig::default();
        assert!(config.is_monitored(CanId::Standard(0x244)));
        assert!(config.is_monitored(CanId::Extended(0x244)));
        assert!(!config.is_monitored(CanId::Standard(0x245)));
        assert!(!config.is_monitored(CanId::Extended(0x1_0244)));
    }

    #[test]
    fn test_output_id_is_standard() {
        let config = GuardConfig {
            monitored_id: 0x1A0,
            ..GuardConfig::default()
        };
        assert_eq!(config.output_id(), CanId::Standard(0x1A0));
    }
}
