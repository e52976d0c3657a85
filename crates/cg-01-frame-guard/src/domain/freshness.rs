//! # Freshness Guard
//!
//! Replay protection for monitored frames via a strictly increasing counter.
//!
//! ## Invariants
//!
//! - A counter is fresh only if it is greater than the last accepted counter
//!   (no counter accepted yet counts as negative infinity).
//! - The cursor only ever moves forward. It is reset only by process restart.
//!
//! ## Counter Exhaustion
//!
//! There is no wraparound tolerance. Once a frame with counter `u16::MAX` is
//! accepted, every later frame is stale until the relay restarts. The relay
//! service logs a warning when that happens.

/// The relay's only mutable state.
///
/// Owned by the relay service and handed out by `&mut` to [`record`] only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayState {
    last_accepted_counter: Option<u16>,
}

impl RelayState {
    /// Fresh state: nothing accepted yet in this process lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_accepted_counter(&self) -> Option<u16> {
        self.last_accepted_counter
    }

    /// Whether no counter above the current one can ever be accepted.
    pub fn is_exhausted(&self) -> bool {
        self.last_accepted_counter == Some(u16::MAX)
    }
}

/// Whether `counter` is strictly newer than anything accepted so far.
pub fn is_fresh(counter: u16, state: &RelayState) -> bool {
    match state.last_accepted_counter {
        None => true,
        Some(last) => counter > last,
    }
}

/// Advance the cursor to `counter`.
///
/// Call only after both the tag and the freshness check passed, and before
/// the frame is forwarded. A non-fresh counter leaves the cursor untouched.
pub fn record(counter: u16, state: &mut RelayState) {
    if is_fresh(counter, state) {
        state.last_accepted_counter = Some(counter);
    }
}
