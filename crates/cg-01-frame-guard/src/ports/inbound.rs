//! # Inbound Ports (Driving Ports / API)
//!
//! The decision API of the frame guard, independent of any bus.

use shared_types::RawFrame;

use crate::domain::entities::FrameVerdict;
use crate::domain::freshness::RelayState;

/// Per-frame decision step.
///
/// Implementations never fail: every input maps to a [`FrameVerdict`], and
/// every rejection is a `FrameVerdict::Drop`.
pub trait FrameGuardApi {
    /// Classify one ingress frame and, on the accept path, advance the
    /// freshness cursor before returning the frame to forward.
    fn process_frame(&mut self, frame: &RawFrame) -> FrameVerdict;

    /// Read-only view of the freshness cursor.
    fn state(&self) -> &RelayState;
}
