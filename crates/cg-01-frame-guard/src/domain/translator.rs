//! # Frame Translator
//!
//! Maps an authenticated speed into the layout the protected segment's
//! consumer expects.
//!
//! ## Trust Boundary
//!
//! The output frame carries no tag. From here on the protected segment trusts
//! the relay, not the original sender, so [`release`] takes an
//! [`AuthenticatedSpeed`], which only exists on the accept path.

use shared_types::{CanId, RawFrame};
use tracing::debug;

use super::codec::{encode_translated, SIGNED_FRAME_LEN};
use super::entities::AuthenticatedSpeed;

/// Translate a speed into the egress byte layout. Performs no validation.
pub fn translate(speed100: u16) -> [u8; SIGNED_FRAME_LEN] {
    encode_translated(speed100)
}

/// Cross the trust boundary: drop the tag and build the egress frame.
pub fn release(id: CanId, speed: &AuthenticatedSpeed) -> RawFrame {
    debug!(
        id = %id,
        speed100 = speed.speed100(),
        counter = speed.counter(),
        "Tag stripped at trust boundary"
    );
    RawFrame::full(id, translate(speed.speed100()))
}
