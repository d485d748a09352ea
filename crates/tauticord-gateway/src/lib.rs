// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook intake for Tauticord.
//!
//! Runs an axum server as a background task that records recently-added
//! notifications from the monitoring server into the local store. The server
//! never talks to the chat platform.

pub mod handlers;
pub mod server;

use async_trait::async_trait;
use tauticord_config::model::WebhooksConfig;
use tauticord_core::traits::PluginAdapter;
use tauticord_core::types::HealthStatus;
use tauticord_core::TauticordError;
use tauticord_storage::Database;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::server::{GatewayState, ServerConfig};

/// Background webhook intake server.
pub struct WebhookServer {
    config: ServerConfig,
    db: Database,
    cancel: CancellationToken,
    server_handle: Mutex<Option<JoinHandle<()>>>,
}

impl WebhookServer {
    pub fn new(config: &WebhooksConfig, db: Database, cancel: CancellationToken) -> Self {
        Self {
            config: ServerConfig {
                host: config.host.clone(),
                port: config.port,
            },
            db,
            cancel,
            server_handle: Mutex::new(None),
        }
    }

    /// Spawn the server task. Bind failures are logged; the bot keeps running
    /// without webhook intake.
    pub async fn start(&self) {
        let config = self.config.clone();
        let state = GatewayState { db: self.db.clone() };
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = server::start_server(&config, state, cancel).await {
                error!(error = %e, "webhook server failed");
            }
        });
        *self.server_handle.lock().await = Some(handle);
        info!(host = %self.config.host, port = self.config.port, "webhook server started");
    }
}

#[async_trait]
impl PluginAdapter for WebhookServer {
    fn name(&self) -> &str {
        "webhooks"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        let handle = self.server_handle.lock().await;
        match handle.as_ref() {
            Some(h) if !h.is_finished() => Ok(HealthStatus::Healthy),
            Some(_) => Ok(HealthStatus::Unhealthy("webhook server exited".to_string())),
            None => Ok(HealthStatus::Unhealthy("server not started".to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), TauticordError> {
        self.cancel.cancel();
        if let Some(handle) = self.server_handle.lock().await.take() {
            let _ = handle.await;
        }
        Ok(())
    }
}
