//! Fuzz target for the per-frame decision.
//!
//! Feeds arbitrary frame sequences through one relay instance and checks
//! that nothing panics and that only correctly tagged, fresh frames are
//! ever forwarded.
//!
//! ## Running
//!
//! ```bash
//! cd crates/cg-01-frame-guard
//! cargo +nightly fuzz run fuzz_process_frame
//! ```

#![no_main]

use cg_01_frame_guard::{
    decode_signed, FrameGuardApi, FrameGuardService, FrameVerdict, GuardConfig, SecretKey,
    TagVerifier,
};
use libfuzzer_sys::fuzz_target;
use shared_types::{CanId, RawFrame};

/// One fuzzed frame.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzFrame {
    extended: bool,
    raw_id: u32,
    payload: Vec<u8>,
}

fuzz_target!(|input: Vec<FuzzFrame>| {
    let key = SecretKey::demo();
    let Ok(mut service) = FrameGuardService::new(GuardConfig::default(), &key) else {
        return;
    };
    let Ok(verifier) = TagVerifier::new(&key) else {
        return;
    };

    for fuzzed in input {
        // Bias half the ids onto the monitored one so the checked path is hit.
        let raw_id = if fuzzed.raw_id % 2 == 0 { 0x244 } else { fuzzed.raw_id };
        let id = if fuzzed.extended {
            CanId::extended(raw_id & 0x1FFF_FFFF)
        } else {
            CanId::standard((raw_id & 0x7FF) as u16)
        };
        let Ok(id) = id else { continue };
        let len = fuzzed.payload.len().min(8);
        let Ok(frame) = RawFrame::new(id, &fuzzed.payload[..len]) else {
            continue;
        };

        let before = service.state().last_accepted_counter();
        let verdict = service.process_frame(&frame);

        match verdict {
            FrameVerdict::Forward { speed, .. } => {
                // 1. Only an authentic 8-byte payload is forwarded
                let signed = decode_signed(frame.payload()).expect("forwarded frame decodes");
                assert!(verifier.verify(&signed));
                // 2. The counter strictly increased
                assert!(before.map_or(true, |last| speed.counter() > last));
                assert_eq!(service.state().last_accepted_counter(), Some(speed.counter()));
            }
            FrameVerdict::Passthrough(out) => {
                assert_eq!(out, frame);
                assert_eq!(service.state().last_accepted_counter(), before);
            }
            FrameVerdict::Drop(_) => {
                assert_eq!(service.state().last_accepted_counter(), before);
            }
        }
    }
});
