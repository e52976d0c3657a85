//! Per-outcome counters for the relay loop.
//!
//! Owned by the loop like the freshness cursor, so plain integers suffice.
//! Nothing is exported; the summary is written to the audit log on shutdown.

use crate::domain::errors::FrameRejection;

/// Relay outcome counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Authenticated frames translated and sent.
    pub forwarded: u64,
    /// Non-monitored frames sent unchanged.
    pub passed_through: u64,
    /// Monitored frames with a payload length other than 8.
    pub malformed: u64,
    /// Monitored frames with a bad tag.
    pub auth_failures: u64,
    /// Monitored frames with a stale or replayed counter.
    pub stale: u64,
    /// Egress sends that failed (frame lost).
    pub transmit_failures: u64,
    /// Ingress receives that failed.
    pub receive_failures: u64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a dropped monitored frame under its reason.
    pub fn record_drop(&mut self, rejection: &FrameRejection) {
        match rejection {
            FrameRejection::MalformedFrame { .. } => self.malformed += 1,
            FrameRejection::AuthenticationFailure { .. } => self.auth_failures += 1,
            FrameRejection::StaleOrReplayed { .. } => self.stale += 1,
        }
    }

    pub fn total_dropped(&self) -> u64 {
        self.malformed + self.auth_failures + self.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CanId;

    #[test]
    fn test_record_drop_by_reason() {
        let id = CanId::Standard(0x244);
        let mut stats = RelayStats::new();

        stats.record_drop(&FrameRejection::MalformedFrame { id, len: 2 });
        stats.record_drop(&FrameRejection::AuthenticationFailure {
            id,
            speed100: 0,
            counter: 0,
        });
        stats.record_drop(&FrameRejection::AuthenticationFailure {
            id,
            speed100: 0,
            counter: 1,
        });
        stats.record_drop(&FrameRejection::StaleOrReplayed {
            id,
            speed100: 0,
            counter: 0,
            last: 0,
        });

        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.auth_failures, 2);
        assert_eq!(stats.stale, 1);
        assert_eq!(stats.total_dropped(), 4);
        assert_eq!(stats.forwarded, 0);
    }
}
