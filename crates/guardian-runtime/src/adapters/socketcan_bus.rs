//! # SocketCAN Bus Adapter
//!
//! `BusPort` over a Linux SocketCAN raw socket (`can0`, `vcan0`, ...).
//!
//! Classic data and remote (RTR) frames are relayed. Error frames read from
//! the ingress socket are skipped and reported to the relay as a timeout.

use std::io;
use std::time::Duration;

use cg_01_frame_guard::BusPort;
use embedded_can::{ExtendedId, Frame as _, Id, StandardId};
use guardian_telemetry::log_frame_event;
use shared_types::{BusError, CanId, RawFrame};
use socketcan::{CanFrame, CanSocket, Socket};
use tracing::{debug, info};

/// One SocketCAN interface.
pub struct SocketCanBus {
    channel: String,
    socket: CanSocket,
    read_timeout: Option<Duration>,
}

impl SocketCanBus {
    /// Open a raw CAN socket bound to `channel`.
    pub fn open(channel: &str) -> Result<Self, BusError> {
        let socket = CanSocket::open(channel).map_err(|e| BusError::Open {
            channel: channel.to_string(),
            reason: e.to_string(),
        })?;

        info!(channel, "CAN interface opened");

        Ok(Self {
            channel: channel.to_string(),
            socket,
            read_timeout: None,
        })
    }

    fn receive_error(&self, error: &io::Error) -> BusError {
        BusError::Receive {
            channel: self.channel.clone(),
            reason: error.to_string(),
        }
    }
}

impl std::fmt::Debug for SocketCanBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketCanBus")
            .field("channel", &self.channel)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

impl BusPort for SocketCanBus {
    fn channel(&self) -> &str {
        &self.channel
    }

    fn receive(&mut self, timeout: Duration) -> Result<Option<RawFrame>, BusError> {
        if self.read_timeout != Some(timeout) {
            self.socket
                .set_read_timeout(timeout)
                .map_err(|e| self.receive_error(&e))?;
            self.read_timeout = Some(timeout);
        }

        let frame = match self.socket.read_frame() {
            Ok(frame) => frame,
            Err(e) if is_timeout(&e) => return Ok(None),
            Err(e) => return Err(self.receive_error(&e)),
        };

        match to_raw(&frame) {
            Some(raw) => {
                log_frame_event!(trace, "RX", raw, channel = %self.channel);
                Ok(Some(raw))
            }
            None => {
                debug!(channel = %self.channel, "Skipping error frame");
                Ok(None)
            }
        }
    }

    fn send(&mut self, frame: &RawFrame) -> Result<(), BusError> {
        let out = from_raw(frame).ok_or_else(|| BusError::Transmit {
            channel: self.channel.clone(),
            reason: format!("cannot encode frame with id {}", frame.id),
        })?;

        self.socket
            .write_frame(&out)
            .map_err(|e| BusError::Transmit {
                channel: self.channel.clone(),
                reason: e.to_string(),
            })?;

        log_frame_event!(trace, "TX", frame, channel = %self.channel);
        Ok(())
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

/// Convert a received frame; `None` for error frames.
fn to_raw(frame: &CanFrame) -> Option<RawFrame> {
    let id = match frame.id() {
        Id::Standard(id) => CanId::Standard(id.as_raw()),
        Id::Extended(id) => CanId::Extended(id.as_raw()),
    };

    match frame {
        CanFrame::Data(_) => RawFrame::new(id, frame.data()).ok(),
        CanFrame::Remote(_) => RawFrame::remote(id, frame.dlc()).ok(),
        CanFrame::Error(_) => None,
    }
}

/// Build an outgoing frame with the same id kind and frame type.
fn from_raw(frame: &RawFrame) -> Option<CanFrame> {
    let id = match frame.id {
        CanId::Standard(raw) => Id::Standard(StandardId::new(raw)?),
        CanId::Extended(raw) => Id::Extended(ExtendedId::new(raw)?),
    };

    if frame.is_remote() {
        CanFrame::new_remote(id, frame.len())
    } else {
        CanFrame::new(id, frame.payload())
    }
}
