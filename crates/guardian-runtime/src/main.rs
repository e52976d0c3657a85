//! # CAN Guardian
//!
//! Authenticated relay between an untrusted CAN segment (ingress) and a
//! protected one (egress).
//!
//! ```text
//! ingress ──► [ frame guard ] ──► egress
//!               │  0x244: tag + counter checked, translated or dropped
//!               └  others: passed through unchanged
//! ```
//!
//! Configuration comes from `CG_*` environment variables; there are no
//! command-line flags. SIGINT or SIGTERM stop the relay within one receive
//! timeout.

use anyhow::{Context, Result};
use guardian_runtime::{spawn_signal_listener, GuardianConfig, GuardianRuntime};
use guardian_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = GuardianConfig::from_env().context("Failed to load configuration")?;
    let runtime = GuardianRuntime::new(config).context("Invalid configuration")?;

    run(runtime).await
}

#[cfg(feature = "socketcan")]
async fn run(runtime: GuardianRuntime) -> Result<()> {
    use guardian_runtime::adapters::SocketCanBus;

    let ingress = SocketCanBus::open(&runtime.config().ingress_channel)
        .context("Failed to open ingress interface")?;
    let egress = SocketCanBus::open(&runtime.config().egress_channel)
        .context("Failed to open egress interface")?;

    let _signals = spawn_signal_listener(runtime.shutdown_signal());

    info!("Relay running. Press Ctrl+C to stop.");
    let stats = runtime.run(ingress, egress).await?;
    info!(
        forwarded = stats.forwarded,
        dropped = stats.total_dropped(),
        "Shutdown complete"
    );

    Ok(())
}

#[cfg(not(feature = "socketcan"))]
async fn run(_runtime: GuardianRuntime) -> Result<()> {
    anyhow::bail!("built without the `socketcan` feature; no bus adapter available")
}
