//! # In-Memory Bus
//!
//! A `BusPort` backed by a queue, for tests and offline replay of captured
//! traffic. Receives never block: an empty queue is reported as a timeout
//! immediately.

use std::collections::VecDeque;
use std::time::Duration;

use shared_types::{BusError, RawFrame};

use crate::ports::outbound::BusPort;
use crate::shutdown::ShutdownSignal;

/// Queue-backed bus segment.
#[derive(Debug, Default)]
pub struct InMemoryBus {
    channel: String,
    inbound: VecDeque<RawFrame>,
    sent: Vec<RawFrame>,
    fail_sends: bool,
    failing_receives: usize,
    shutdown_on_drain: Option<ShutdownSignal>,
}

impl InMemoryBus {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ..Self::default()
        }
    }

    /// Queue a frame to be returned by a later `receive`.
    pub fn push(&mut self, frame: RawFrame) {
        self.inbound.push_back(frame);
    }

    pub fn extend<T: IntoIterator<Item = RawFrame>>(&mut self, frames: T) {
        self.inbound.extend(frames);
    }

    /// Frames successfully sent to this bus, in order.
    pub fn sent(&self) -> &[RawFrame] {
        &self.sent
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Make every `send` fail until switched back.
    pub fn set_fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    /// Make the next `count` receives fail before any queued frame is returned.
    pub fn fail_next_receives(&mut self, count: usize) {
        self.failing_receives = count;
    }

    /// Trigger `signal` the first time `receive` finds the queue empty.
    pub fn shutdown_when_drained(&mut self, signal: ShutdownSignal) {
        self.shutdown_on_drain = Some(signal);
    }
}

impl BusPort for InMemoryBus {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Option<RawFrame>, BusError> {
        if self.failing_receives > 0 {
            self.failing_receives -= 1;
            return Err(BusError::Receive {
                channel: self.channel.clone(),
                reason: "injected receive failure".to_string(),
            });
        }

        match self.inbound.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => {
                if let Some(signal) = &self.shutdown_on_drain {
                    signal.trigger();
                }
                Ok(None)
            }
        }
    }

    fn send(&mut self, frame: &RawFrame) -> Result<(), BusError> {
        if self.fail_sends {
            return Err(BusError::Transmit {
                channel: self.channel.clone(),
                reason: "injected transmit failure".to_string(),
            });
        }
        self.sent.push(*frame);
        Ok(())
    }
}
