// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chart renderer.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tauticord_core::traits::{ChartRenderer, ChartSpec, PluginAdapter};
use tauticord_core::types::HealthStatus;
use tauticord_core::TauticordError;

/// PNG signature followed by a marker, enough for attachment assertions.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nmock";

/// Records every [`ChartSpec`] and returns [`FAKE_PNG`].
#[derive(Clone, Default)]
pub struct MockRenderer {
    rendered: Arc<Mutex<Vec<ChartSpec>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rendered(&self) -> Vec<ChartSpec> {
        self.rendered.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockRenderer {
    fn name(&self) -> &str {
        "mock-renderer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChartRenderer for MockRenderer {
    async fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, TauticordError> {
        self.rendered.lock().await.push(spec.clone());
        Ok(FAKE_PNG.to_vec())
    }
}
