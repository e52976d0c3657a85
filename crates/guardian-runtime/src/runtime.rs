//! # Guardian Runtime
//!
//! Owns one configured relay and drives it on a dedicated blocking thread.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Warn if the demo key is in use
//! 3. Prepare the tag verifier (key schedule runs once here)
//! 4. Run the relay loop until the shutdown flag is raised

use cg_01_frame_guard::{BusPort, FrameGuardService, RelayStats, ShutdownSignal};
use thiserror::Error;
use tracing::{info, warn};

use crate::container::{ConfigError, GuardianConfig};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("relay thread terminated abnormally: {0}")]
    RelayAborted(String),
}

/// A configured, not yet running relay.
#[derive(Debug)]
pub struct GuardianRuntime {
    config: GuardianConfig,
    service: FrameGuardService,
    shutdown: ShutdownSignal,
}

impl GuardianRuntime {
    pub fn new(config: GuardianConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        if config.uses_demo_key() {
            warn!(
                security = true,
                "Running with the publicly known demo key; set CG_SECRET_KEY for any real deployment"
            );
        }

        let service = FrameGuardService::new(config.guard_config(), &config.secret_key)
            .map_err(ConfigError::from)?;

        info!(
            ingress = %config.ingress_channel,
            egress = %config.egress_channel,
            monitored_id = config.monitored_id,
            key_len = config.secret_key.len(),
            "Guardian configured"
        );

        Ok(Self {
            config,
            service,
            shutdown: ShutdownSignal::new(),
        })
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    /// Handle for requesting shutdown from another task.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Run the relay on a blocking thread until shutdown and return its counters.
    pub async fn run<I, E>(self, mut ingress: I, mut egress: E) -> Result<RelayStats, RuntimeError>
    where
        I: BusPort + 'static,
        E: BusPort + 'static,
    {
        let Self {
            mut service,
            shutdown,
            ..
        } = self;

        let relay = tokio::task::spawn_blocking(move || {
            service.run(&mut ingress, &mut egress, &shutdown)
        });

        relay
            .await
            .map_err(|e| RuntimeError::RelayAborted(e.to_string()))
    }
}
