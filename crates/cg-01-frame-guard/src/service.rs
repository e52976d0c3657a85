//! # Frame Guard Service
//!
//! Application service layer: implements `FrameGuardApi` and runs the relay
//! loop against two `BusPort`s.
//!
//! ## Per-frame pipeline
//!
//! ```text
//! ingress ──► monitored id? ──no──► passthrough ───────────────────────► egress
//!                 │
//!                yes
//!                 ▼
//!           decode (8 bytes?) ──► verify tag ──► fresh counter? ──► record
//!                 │                   │               │                │
//!               drop                drop            drop          translate ──► egress
//! ```
//!
//! Every branch ends in forward or drop-and-continue. Nothing in here can
//! stop the loop except the shutdown signal.

use shared_types::RawFrame;
use tracing::{debug, error, info, warn};

use crate::domain::codec::decode_signed;
use crate::domain::config::GuardConfig;
use crate::domain::entities::{AuthenticatedSpeed, FrameVerdict, RelayPhase};
use crate::domain::errors::{FrameRejection, KeyError};
use crate::domain::freshness::{self, RelayState};
use crate::domain::secret::SecretKey;
use crate::domain::tag::TagVerifier;
use crate::domain::translator;
use crate::metrics::RelayStats;
use crate::ports::inbound::FrameGuardApi;
use crate::ports::outbound::BusPort;
use crate::shutdown::ShutdownSignal;

/// One relay instance.
///
/// Owns the freshness cursor exclusively. A single instance must be driven
/// from a single thread; concurrent ingestion paths have to funnel through
/// one instance rather than share its state.
#[derive(Debug)]
pub struct FrameGuardService {
    config: GuardConfig,
    verifier: TagVerifier,
    state: RelayState,
    stats: RelayStats,
    phase: RelayPhase,
}

impl FrameGuardService {
    /// Create a relay in the `Running` phase with an empty freshness cursor.
    pub fn new(config: GuardConfig, key: &SecretKey) -> Result<Self, KeyError> {
        Ok(Self {
            config,
            verifier: TagVerifier::new(key)?,
            state: RelayState::new(),
            stats: RelayStats::new(),
            phase: RelayPhase::Running,
        })
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    pub fn phase(&self) -> RelayPhase {
        self.phase
    }

    /// Run the relay until `shutdown` is triggered.
    ///
    /// The flag is checked before every receive; each receive waits at most
    /// `receive_timeout`. Returns the final counters.
    pub fn run<I, E>(
        &mut self,
        ingress: &mut I,
        egress: &mut E,
        shutdown: &ShutdownSignal,
    ) -> RelayStats
    where
        I: BusPort + ?Sized,
        E: BusPort + ?Sized,
    {
        let monitored_id = format!("0x{:X}", self.config.monitored_id);
        info!(
            ingress = ingress.channel(),
            egress = egress.channel(),
            monitored_id = %monitored_id,
            timeout_ms = self.config.receive_timeout.as_millis() as u64,
            "Relay started"
        );

        while self.phase == RelayPhase::Running {
            if shutdown.is_triggered() {
                self.phase = RelayPhase::ShuttingDown;
                break;
            }

            match ingress.receive(self.config.receive_timeout) {
                Ok(None) => {}
                Ok(Some(frame)) => self.handle_frame(&frame, egress),
                Err(e) => {
                    self.stats.receive_failures += 1;
                    error!(channel = ingress.channel(), error = %e, "Receive failed");
                    // Keep the loop a bounded wait even when the bus errors out
                    // immediately on every call.
                    std::thread::sleep(self.config.receive_timeout);
                }
            }
        }

        info!(
            forwarded = self.stats.forwarded,
            passed_through = self.stats.passed_through,
            malformed = self.stats.malformed,
            auth_failures = self.stats.auth_failures,
            stale = self.stats.stale,
            transmit_failures = self.stats.transmit_failures,
            receive_failures = self.stats.receive_failures,
            last_counter = ?self.state.last_accepted_counter(),
            "Relay stopped"
        );

        self.stats.clone()
    }

    /// Decide on one frame, log the decision and send whatever is forwarded.
    pub fn handle_frame<E>(&mut self, frame: &RawFrame, egress: &mut E)
    where
        E: BusPort + ?Sized,
    {
        match self.process_frame(frame) {
            FrameVerdict::Passthrough(out) => match egress.send(&out) {
                Ok(()) => {
                    self.stats.passed_through += 1;
                    debug!(id = %out.id, len = out.len(), "PASS");
                }
                Err(e) => {
                    self.stats.transmit_failures += 1;
                    error!(id = %out.id, error = %e, "Failed to forward non-monitored frame");
                }
            },
            FrameVerdict::Forward { frame: out, speed } => {
                if self.state.is_exhausted() {
                    warn!(
                        counter = speed.counter(),
                        "Freshness counter space exhausted: every further monitored frame \
                         will be rejected until the relay restarts"
                    );
                }
                // The cursor has already advanced; a failed send does not roll it back.
                match egress.send(&out) {
                    Ok(()) => {
                        self.stats.forwarded += 1;
                        info!(
                            id = %out.id,
                            speed_kph = speed.speed_kph(),
                            counter = speed.counter(),
                            channel = egress.channel(),
                            "FORWARD"
                        );
                    }
                    Err(e) => {
                        self.stats.transmit_failures += 1;
                        error!(
                            id = %out.id,
                            counter = speed.counter(),
                            error = %e,
                            "Failed to send translated frame"
                        );
                    }
                }
            }
            FrameVerdict::Drop(rejection) => {
                self.stats.record_drop(&rejection);
                log_drop(&rejection);
            }
        }
    }

    fn authenticate(&mut self, frame: &RawFrame) -> Result<AuthenticatedSpeed, FrameRejection> {
        let id = frame.id;

        let signed = decode_signed(frame.payload()).map_err(|_| FrameRejection::MalformedFrame {
            id,
            len: frame.len(),
        })?;

        if !self.verifier.verify(&signed) {
            return Err(FrameRejection::AuthenticationFailure {
                id,
                speed100: signed.speed100,
                counter: signed.counter,
            });
        }

        if !freshness::is_fresh(signed.counter, &self.state) {
            return Err(FrameRejection::StaleOrReplayed {
                id,
                speed100: signed.speed100,
                counter: signed.counter,
                last: self.state.last_accepted_counter().unwrap_or_default(),
            });
        }

        freshness::record(signed.counter, &mut self.state);
        Ok(AuthenticatedSpeed::new(&signed))
    }
}

impl FrameGuardApi for FrameGuardService {
    fn process_frame(&mut self, frame: &RawFrame) -> FrameVerdict {
        if !self.config.is_monitored(frame.id) {
            return FrameVerdict::Passthrough(*frame);
        }

        match self.authenticate(frame) {
            Ok(speed) => FrameVerdict::Forward {
                frame: translator::release(self.config.output_id(), &speed),
                speed,
            },
            Err(rejection) => FrameVerdict::Drop(rejection),
        }
    }

    fn state(&self) -> &RelayState {
        &self.state
    }
}

fn log_drop(rejection: &FrameRejection) {
    let reason = rejection.reason();
    let security = rejection.is_security_relevant();
    match *rejection {
        FrameRejection::MalformedFrame { id, len } => {
            warn!(id = %id, len, reason, security, "DROP: invalid data length");
        }
        FrameRejection::AuthenticationFailure {
            id,
            speed100,
            counter,
        } => {
            warn!(
                id = %id,
                speed100,
                counter,
                reason,
                security,
                "DROP: bad tag"
            );
        }
        FrameRejection::StaleOrReplayed {
            id,
            speed100,
            counter,
            last,
        } => {
            warn!(
                id = %id,
                speed100,
                counter,
                last,
                reason,
                security,
                "DROP: replay / old counter"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::encode_signed;
    use shared_types::CanId;
    use std::sync::{Arc, Mutex};

    const SPEED_ID: CanId = CanId::Standard(0x244);

    fn make_service() -> FrameGuardService {
        FrameGuardService::new(GuardConfig::default(), &SecretKey::demo()).unwrap()
    }

    fn signed_frame(speed100: u16, counter: u16) -> RawFrame {
        let verifier = TagVerifier::new(&SecretKey::demo()).unwrap();
        RawFrame::full(SPEED_ID, encode_signed(&verifier.sign(speed100, counter)))
    }

    #[test]
    fn test_new_service_is_running_and_empty() {
        let service = make_service();
        assert_eq!(service.phase(), RelayPhase::Running);
        assert_eq!(service.state().last_accepted_counter(), None);
        assert_eq!(service.stats(), &RelayStats::new());
    }

    #[test]
    fn test_valid_frame_is_forwarded_translated() {
        let mut service = make_service();
        let verdict = service.process_frame(&signed_frame(6000, 1));

        let FrameVerdict::Forward { frame, speed } = verdict else {
            panic!("expected forward");
        };
        assert_eq!(frame.id, SPEED_ID);
        assert_eq!(frame.payload(), &[0, 0, 0, 0x17, 0x70, 0, 0, 0]);
        assert_eq!(speed.speed100(), 6000);
        assert_eq!(speed.counter(), 1);
        assert_eq!(service.state().last_accepted_counter(), Some(1));
    }

    #[test]
    fn test_replayed_frame_is_dropped() {
        let mut service = make_service();
        let frame = signed_frame(6000, 1);

        assert!(matches!(
            service.process_frame(&frame),
            FrameVerdict::Forward { .. }
        ));
        assert_eq!(
            service.process_frame(&frame),
            FrameVerdict::Drop(FrameRejection::StaleOrReplayed {
                id: SPEED_ID,
                speed100: 6000,
                counter: 1,
                last: 1,
            })
        );
        assert_eq!(service.state().last_accepted_counter(), Some(1));
    }

    #[test]
    fn test_bad_tag_checked_before_freshness() {
        let mut service = make_service();
        let mut frame = signed_frame(6000, 1);
        let mut payload = [0u8; 8];
        payload.copy_from_slice(frame.payload());
        payload[7] ^= 0x01;
        frame = RawFrame::full(SPEED_ID, payload);

        let verdict = service.process_frame(&frame);
        assert!(matches!(
            verdict,
            FrameVerdict::Drop(FrameRejection::AuthenticationFailure { counter: 1, .. })
        ));
        assert_eq!(service.state().last_accepted_counter(), None);
    }

    #[test]
    fn test_short_monitored_frame_is_malformed() {
        let mut service = make_service();
        let frame = RawFrame::new(SPEED_ID, &[0x17, 0x70, 0x00]).unwrap();
        assert_eq!(
            service.process_frame(&frame),
            FrameVerdict::Drop(FrameRejection::MalformedFrame { id: SPEED_ID, len: 3 })
        );
    }

    #[test]
    fn test_other_ids_pass_through_untouched() {
        let mut service = make_service();
        let frame = RawFrame::new(CanId::Standard(0x1A0), &[1, 2, 3]).unwrap();
        assert_eq!(service.process_frame(&frame), FrameVerdict::Passthrough(frame));
        assert_eq!(service.state().last_accepted_counter(), None);
    }

    #[test]
    fn test_extended_id_with_monitored_value_is_checked() {
        let mut service = make_service();
        let frame = RawFrame::full(CanId::Extended(0x244), [0u8; 8]);
        assert!(matches!(
            service.process_frame(&frame),
            FrameVerdict::Drop(FrameRejection::AuthenticationFailure { .. })
        ));
    }

    #[test]
    fn test_accepted_extended_frame_is_emitted_standard() {
        let mut service = make_service();
        let signed = signed_frame(6000, 1);
        let mut payload = [0u8; 8];
        payload.copy_from_slice(signed.payload());

        let verdict = service.process_frame(&RawFrame::full(CanId::Extended(0x244), payload));

        let FrameVerdict::Forward { frame, .. } = verdict else {
            panic!("expected forward");
        };
        assert_eq!(frame.id, CanId::Standard(0x244));
    }

    #[test]
    fn test_remote_frames() {
        let mut service = make_service();

        let other = RawFrame::remote(CanId::Standard(0x100), 2).unwrap();
        assert_eq!(service.process_frame(&other), FrameVerdict::Passthrough(other));

        let monitored = RawFrame::remote(SPEED_ID, 8).unwrap();
        assert_eq!(
            service.process_frame(&monitored),
            FrameVerdict::Drop(FrameRejection::MalformedFrame { id: SPEED_ID, len: 8 })
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn drop_log_line(rejection: &FrameRejection) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || log_drop(rejection));

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_drop_log_marks_only_bad_tags_as_security_events() {
        let bad_tag = drop_log_line(&FrameRejection::AuthenticationFailure {
            id: SPEED_ID,
            speed100: 6000,
            counter: 1,
        });
        assert!(bad_tag.contains("reason=\"bad_tag\"") || bad_tag.contains("reason=bad_tag"));
        assert!(bad_tag.contains("security=true"));

        let stale = drop_log_line(&FrameRejection::StaleOrReplayed {
            id: SPEED_ID,
            speed100: 6000,
            counter: 1,
            last: 1,
        });
        assert!(stale.contains("security=false"));

        let malformed = drop_log_line(&FrameRejection::MalformedFrame { id: SPEED_ID, len: 3 });
        assert!(malformed.contains("security=false"));
    }
}
