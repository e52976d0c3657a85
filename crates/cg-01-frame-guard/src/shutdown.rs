//! Cooperative shutdown flag.
//!
//! Signal handlers only ever call [`ShutdownSignal::trigger`]. The relay loop
//! reads the flag at the top of each iteration, so the transition to
//! `ShuttingDown` happens on the loop's own thread, at the latest one receive
//! timeout after the request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable shutdown request flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent, lock-free, performs no I/O.
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
