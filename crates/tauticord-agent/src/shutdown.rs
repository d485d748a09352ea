// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that every refresh loop monitors.

use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tauticord_core::TauticordError;

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, listening for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Finished refresh loops as (service name, result).
pub type LoopSet = JoinSet<(String, Result<(), TauticordError>)>;

/// Waits up to `timeout` for refresh loops to finish their in-flight tick,
/// then aborts the rest.
pub async fn drain_loops(loops: &mut LoopSet, timeout: Duration) {
    if loops.is_empty() {
        info!("no refresh loops to drain");
        return;
    }

    info!(count = loops.len(), "waiting for refresh loops to stop");
    let drained = tokio::time::timeout(timeout, async {
        while let Some(joined) = loops.join_next().await {
            if let Ok((name, _)) = joined {
                debug!(service = %name, "refresh loop drained");
            }
        }
    })
    .await;

    if drained.is_err() {
        warn!(remaining = loops.len(), "timeout reached, aborting refresh loops");
        loops.abort_all();
    }
}
