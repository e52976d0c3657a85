//! # Frame Codec
//!
//! The two fixed 8-byte wire layouts the relay understands.
//!
//! ```text
//! signed (ingress)    [ speed100 BE | counter BE | tag (4)          ]
//!                       0    1        2    3       4    5    6    7
//! translated (egress) [ 0  0  0 | speed100 BE | 0  0  0 ]
//!                       0  1  2   3    4        5  6  7
//! ```
//!
//! The egress offset is fixed by the downstream consumer and differs from the
//! ingress layout on purpose.

use super::entities::SignedSpeedFrame;
use super::errors::CodecError;
use super::tag::TAG_LEN;

/// Length of both wire layouts.
pub const SIGNED_FRAME_LEN: usize = 8;

/// Byte offset of the high speed byte in the translated layout.
pub const TRANSLATED_SPEED_OFFSET: usize = 3;

/// Decode a monitored payload.
///
/// # Errors
/// `CodecError::InvalidLength` unless the payload is exactly 8 bytes.
pub fn decode_signed(payload: &[u8]) -> Result<SignedSpeedFrame, CodecError> {
    let bytes: &[u8; SIGNED_FRAME_LEN] =
        payload.try_into().map_err(|_| CodecError::InvalidLength {
            expected: SIGNED_FRAME_LEN,
            actual: payload.len(),
        })?;

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&bytes[4..8]);

    Ok(SignedSpeedFrame {
        speed100: u16::from_be_bytes([bytes[0], bytes[1]]),
        counter: u16::from_be_bytes([bytes[2], bytes[3]]),
        tag,
    })
}

/// Encode a signed frame into the ingress layout (sender side).
pub fn encode_signed(frame: &SignedSpeedFrame) -> [u8; SIGNED_FRAME_LEN] {
    let mut out = [0u8; SIGNED_FRAME_LEN];
    out[0..2].copy_from_slice(&frame.speed100.to_be_bytes());
    out[2..4].copy_from_slice(&frame.counter.to_be_bytes());
    out[4..8].copy_from_slice(&frame.tag);
    out
}

/// Encode a speed into the translated egress layout.
pub fn encode_translated(speed100: u16) -> [u8; SIGNED_FRAME_LEN] {
    let mut out = [0u8; SIGNED_FRAME_LEN];
    out[TRANSLATED_SPEED_OFFSET..TRANSLATED_SPEED_OFFSET + 2]
        .copy_from_slice(&speed100.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_layout() {
        let frame = decode_signed(&[0x17, 0x70, 0x00, 0x01, 0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(frame.speed100, 6000);
        assert_eq!(frame.counter, 1);
        assert_eq!(frame.tag, [0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_decode_rejects_wrong_lengths() {
        for len in [0usize, 1, 4, 7, 9, 16] {
            let payload = vec![0u8; len];
            assert_eq!(
                decode_signed(&payload),
                Err(CodecError::InvalidLength {
                    expected: 8,
                    actual: len
                })
            );
        }
    }

    #[test]
    fn test_encode_signed_inverts_decode() {
        let payload = [0xFF, 0xFE, 0x80, 0x00, 1, 2, 3, 4];
        let frame = decode_signed(&payload).unwrap();
        assert_eq!(encode_signed(&frame), payload);
    }

    #[test]
    fn test_translated_layout() {
        assert_eq!(
            encode_translated(6000),
            [0x00, 0x00, 0x00, 0x17, 0x70, 0x00, 0x00, 0x00]
        );
        assert_eq!(encode_translated(0), [0u8; 8]);
        assert_eq!(
            encode_translated(u16::MAX),
            [0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00]
        );
    }
}
