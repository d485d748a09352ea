// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook intake server built on axum.
//!
//! Sets up routes, middleware, and shared state for the intake endpoint.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tauticord_core::TauticordError;
use tauticord_storage::Database;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Path the monitoring server's notifier posts to.
pub const RECENTLY_ADDED_PATH: &str = "/webhooks/tautulli/recently_added";

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Webhook intake store.
    pub db: Database,
}

/// Intake server configuration (mirrors `WebhooksConfig`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the intake router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(RECENTLY_ADDED_PATH, post(handlers::post_recently_added))
        .route("/ping", get(handlers::get_ping))
        .route("/hello", get(handlers::get_hello))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), TauticordError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TauticordError::Internal(format!("failed to bind webhook server to {addr}: {e}")))?;
    let local: Option<SocketAddr> = listener.local_addr().ok();
    tracing::info!(addr = ?local, "webhook server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| TauticordError::Internal(format!("webhook server error: {e}")))?;

    tracing::info!("webhook server stopped");
    Ok(())
}
