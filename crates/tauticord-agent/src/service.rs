// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic refresh loops.
//!
//! Every service is a [`RefreshService`]; [`start`] runs its `tick` until the
//! cancellation token fires. Transient errors are logged and retried on the
//! next tick. Anything else ends the loop with the error, which the
//! supervisor turns into a process exit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tauticord_core::TauticordError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// A service refreshed on a fixed interval.
#[async_trait]
pub trait RefreshService: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Pause between the end of one tick and the start of the next.
    fn interval(&self) -> Duration;

    /// One-time setup run before the first tick.
    async fn on_ready(&self) -> Result<(), TauticordError> {
        Ok(())
    }

    async fn tick(&self) -> Result<(), TauticordError>;
}

/// Spawn the refresh loop of `service`.
pub fn start(
    service: Arc<dyn RefreshService>,
    cancel: CancellationToken,
) -> JoinHandle<Result<(), TauticordError>> {
    tokio::spawn(async move {
        let name = service.name().to_string();
        service.on_ready().await?;
        info!(service = %name, interval_secs = service.interval().as_secs(), "refresh loop started");

        loop {
            if cancel.is_cancelled() {
                break;
            }
            match service.tick().await {
                Ok(()) => debug!(service = %name, "tick complete"),
                Err(e) if e.is_transient() => {
                    error!(service = %name, error = %e, "tick failed, retrying next interval")
                }
                Err(e) => {
                    error!(service = %name, error = %e, "refresh loop aborted");
                    return Err(e);
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(service.interval()) => {}
            }
        }

        info!(service = %name, "refresh loop stopped");
        Ok(())
    })
}
