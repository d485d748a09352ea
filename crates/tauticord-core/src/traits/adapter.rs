// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every external collaborator.

use async_trait::async_trait;

use crate::error::TauticordError;
use crate::types::HealthStatus;

/// Identity and health for an external collaborator (monitoring API client,
/// chat platform client, chart renderer).
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, TauticordError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), TauticordError> {
        Ok(())
    }
}
