//! # Tag Verifier
//!
//! Truncated HMAC-SHA256 authentication of speed frames.
//!
//! The tag covers the 4-byte big-endian message `speed100 || counter` and is
//! cut to its first 4 bytes so that value, counter and tag fit a single
//! 8-byte CAN payload. That buys bus bandwidth at the cost of forgery
//! resistance (32-bit tags).
//!
//! ## Security
//!
//! Comparison against the recomputed tag goes through `subtle` and runs in
//! constant time. An early-exit comparison here would leak how many leading
//! tag bytes a forger got right.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::entities::SignedSpeedFrame;
use super::errors::KeyError;
use super::secret::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Length of the truncated tag on the wire.
pub const TAG_LEN: usize = 4;

/// Truncated authentication tag.
pub type Tag = [u8; TAG_LEN];

/// Build the authenticated message: `speed100 || counter`, big-endian.
pub fn tag_message(speed100: u16, counter: u16) -> [u8; 4] {
    let mut msg = [0u8; 4];
    msg[0..2].copy_from_slice(&speed100.to_be_bytes());
    msg[2..4].copy_from_slice(&counter.to_be_bytes());
    msg
}

/// Recomputes and checks tags under one shared key.
///
/// The keyed MAC state is prepared once and cloned per frame, so the key
/// schedule is not redone on the hot path.
#[derive(Clone)]
pub struct TagVerifier {
    keyed: HmacSha256,
}

impl TagVerifier {
    /// Prepare a verifier for `key`.
    pub fn new(key: &SecretKey) -> Result<Self, KeyError> {
        let keyed = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| KeyError::Rejected(e.to_string()))?;
        Ok(Self { keyed })
    }

    /// First 4 bytes of HMAC-SHA256(key, speed100 || counter).
    pub fn expected_tag(&self, speed100: u16, counter: u16) -> Tag {
        let mut mac = self.keyed.clone();
        mac.update(&tag_message(speed100, counter));
        let digest = mac.finalize().into_bytes();

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&digest[..TAG_LEN]);
        tag
    }

    /// Whether `frame.tag` matches the recomputed tag. Constant time.
    pub fn verify(&self, frame: &SignedSpeedFrame) -> bool {
        let expected = self.expected_tag(frame.speed100, frame.counter);
        expected[..].ct_eq(&frame.tag[..]).into()
    }

    /// Build a correctly tagged frame (sender side of the shared key).
    pub fn sign(&self, speed100: u16, counter: u16) -> SignedSpeedFrame {
        SignedSpeedFrame {
            speed100,
            counter,
            tag: self.expected_tag(speed100, counter),
        }
    }
}

impl std::fmt::Debug for TagVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TagVerifier(***)")
    }
}
