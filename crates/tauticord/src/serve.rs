// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boot sequence.
//!
//! Migrates and loads the configuration, opens the webhook store, builds the
//! upstream, platform and chart clients, then runs the supervisor, the
//! webhook server and the Discord gateway until shutdown or a fatal error.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tauticord_agent::chart::QuickChartRenderer;
use tauticord_agent::shutdown;
use tauticord_agent::{AgentContext, Supervisor};
use tauticord_config::migrations;
use tauticord_config::{ConfigPaths, TauticordConfig};
use tauticord_core::{PluginAdapter, TauticordError};
use tauticord_gateway::WebhookServer;
use tauticord_storage::Database;
use tauticord_tautulli::TautulliApi;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::usage;

/// Capacity of the gateway → supervisor event channel.
const EVENT_BUFFER: usize = 256;

/// How long the gateway gets to close after the supervisor stops.
const GATEWAY_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Running crate version, used for the database stamp and update checks.
pub fn running_version() -> semver::Version {
    semver::Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or(semver::Version::new(0, 0, 0))
}

/// Bring the configuration file up to the current schema.
pub fn migrate_config(paths: &ConfigPaths, env: &HashMap<String, String>) -> Result<(), TauticordError> {
    let report = migrations::run_migrations(paths, env)?;
    let applied = report.applied();
    if !applied.is_empty() {
        info!(migrations = ?applied, "configuration migrated");
    }
    Ok(())
}

/// Load and validate the configuration file. Problems are rendered to stderr
/// as diagnostics.
pub fn load_config(paths: &ConfigPaths) -> Result<TauticordConfig, TauticordError> {
    tauticord_config::load_and_validate(&paths.file).map_err(|errors| {
        tauticord_config::render_errors(&errors);
        TauticordError::Config(format!(
            "{} configuration error(s) in {}",
            errors.len(),
            paths.file.display()
        ))
    })
}

/// Open the webhook store, applying its schema migrations.
pub async fn open_database(path: &Path) -> Result<Database, TauticordError> {
    let path = path
        .to_str()
        .ok_or_else(|| TauticordError::Config(format!("database path {} is not UTF-8", path.display())))?;
    Database::open(path, &running_version()).await
}

/// Run Tauticord until shutdown. The error decides the exit code.
pub async fn run(cli: Cli) -> Result<(), TauticordError> {
    info!(version = env!("CARGO_PKG_VERSION"), "starting tauticord");

    let paths = ConfigPaths::resolve(&cli.config);
    let env = migrations::process_env();
    migrate_config(&paths, &env)?;
    let db = open_database(&cli.database).await?;
    let config = load_config(&paths)?;

    if config.extras.analytics {
        match usage::record_start(&cli.usage, env!("CARGO_PKG_VERSION"), chrono::Utc::now()) {
            Ok(record) => info!(install_id = %record.install_id, starts = record.starts, "usage recorded"),
            Err(e) => warn!(error = %e, "could not write usage record"),
        }
    }

    let upstream = Arc::new(TautulliApi::new(&config.tautulli)?);
    let renderer = Arc::new(QuickChartRenderer::new(config.extras.chart_renderer_url.clone())?);

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let (platform, gateway) = tauticord_discord::connect(&config.discord, events_tx).await?;
    platform.verify().await?;
    let platform = Arc::new(platform);

    let cancel = shutdown::install_signal_handler();
    let webhooks_enabled = config.webhooks.enable;
    let webhooks = WebhookServer::new(&config.webhooks, db.clone(), cancel.child_token());

    let ctx = AgentContext::new(config, upstream, platform, renderer).with_emoji_assets(cli.emojis.clone());
    let supervisor = Supervisor::new(ctx, cancel.clone());
    info!(services = ?supervisor.service_names(), "services registered");

    if webhooks_enabled {
        webhooks.start().await;
    }

    let gateway_cancel = cancel.clone();
    let mut gateway_task = tokio::spawn(async move {
        let result = gateway.run().await;
        gateway_cancel.cancel();
        result
    });

    let outcome = supervisor.run(events_rx).await;

    if let Err(e) = webhooks.shutdown().await {
        warn!(error = %e, "webhook server shutdown failed");
    }

    let gateway_outcome = match tokio::time::timeout(GATEWAY_CLOSE_TIMEOUT, &mut gateway_task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(TauticordError::Internal(format!("gateway task failed: {e}"))),
        Err(_) => {
            warn!("gateway did not close in time");
            gateway_task.abort();
            Ok(())
        }
    };

    if let Err(e) = db.close().await {
        warn!(error = %e, "database close failed");
    }

    match (outcome, gateway_outcome) {
        (Err(e), _) | (Ok(()), Err(e)) => {
            error!(error = %e, "tauticord stopped with an error");
            Err(e)
        }
        (Ok(()), Ok(())) => {
            info!("tauticord stopped");
            Ok(())
        }
    }
}
