//! Periodic purge of expired revocation records
//!
//! Purging only controls storage growth. A record whose token has expired
//! is redundant because the token already fails its own expiry check.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::errors::DomainError;
use crate::repositories::RevocationRepository;

/// Configuration for the revocation sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to run a sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether the background task runs at all
    pub enabled: bool,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl From<&sh_shared::config::RevocationConfig> for SweeperConfig {
    fn from(config: &sh_shared::config::RevocationConfig) -> Self {
        Self {
            interval_seconds: config.sweep_interval_seconds,
            enabled: config.sweep_enabled,
        }
    }
}

/// Summary of one sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepResult {
    pub records_purged: usize,
    pub swept_at: DateTime<Utc>,
}

/// Runs `purge_expired` off the request path
pub struct RevocationSweeper<R: RevocationRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: SweeperConfig,
}

impl<R: RevocationRepository + ?Sized + 'static> RevocationSweeper<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: SweeperConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Run a single sweep at the clock's current time
    pub async fn run_sweep(&self) -> Result<SweepResult, DomainError> {
        let swept_at = self.clock.now();
        let records_purged = self.repository.purge_expired(swept_at).await?;

        info!(records_purged, swept_at = %swept_at, "Revocation sweep completed");

        Ok(SweepResult {
            records_purged,
            swept_at,
        })
    }

    /// Spawn the sweep loop on the tokio runtime
    ///
    /// Returns `None` when sweeping is disabled. Failures are logged and the
    /// loop keeps running.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Revocation sweeper is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = self.config.interval_seconds,
                "Revocation sweeper started"
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_sweep().await {
                    error!(error = %e, "Revocation sweep failed");
                }
            }
        }))
    }
}
