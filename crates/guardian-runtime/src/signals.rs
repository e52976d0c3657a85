//! OS signal handling.
//!
//! The signal task does nothing but flip the relay's [`ShutdownSignal`]. The
//! relay thread notices at its next receive boundary and winds down itself.

use std::future::Future;

use cg_01_frame_guard::ShutdownSignal;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Wait for SIGINT or SIGTERM and return the signal's name.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            Ok("SIGINT")
        }
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

/// Wait for Ctrl+C and return the signal's name.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

/// Spawn a task that triggers `shutdown` on the first termination signal.
///
/// If the handlers cannot be installed the relay is stopped right away.
pub fn spawn_signal_listener(shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(trigger_on(wait_for_termination(), shutdown))
}

/// Raise `shutdown` once `termination` resolves, then log the cause.
async fn trigger_on<F>(termination: F, shutdown: ShutdownSignal)
where
    F: Future<Output = std::io::Result<&'static str>>,
{
    let result = termination.await;
    shutdown.trigger();

    match result {
        Ok(name) => info!(signal = name, "Shutdown requested"),
        Err(e) => error!(error = %e, "Failed to install signal handlers, stopping relay"),
    }
}
