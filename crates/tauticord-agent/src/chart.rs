// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chart rendering through a QuickChart-compatible HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tauticord_core::traits::{ChartRenderer, ChartSpec, ChartStyle, PluginAdapter};
use tauticord_core::types::HealthStatus;
use tauticord_core::TauticordError;
use tracing::debug;

const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

const PALETTE: [&str; 6] = ["#E5A00D", "#1F77B4", "#2CA02C", "#D62728", "#9467BD", "#8C564B"];

/// Chart.js configuration for `spec`.
pub fn chart_config(spec: &ChartSpec) -> Value {
    let datasets: Vec<Value> = spec
        .series
        .series
        .iter()
        .enumerate()
        .map(|(i, named)| {
            let color = PALETTE[i % PALETTE.len()];
            json!({
                "label": named.name,
                "data": named.data,
                "backgroundColor": color,
                "borderColor": color,
                "fill": false,
            })
        })
        .collect();
    let max = spec.y_ticks.last().copied().unwrap_or(1.0);
    let step = spec.y_ticks.first().copied().unwrap_or(max);

    json!({
        "type": match spec.style {
            ChartStyle::Bar => "bar",
            ChartStyle::Line => "line",
        },
        "data": {
            "labels": spec.series.categories,
            "datasets": datasets,
        },
        "options": {
            "title": { "display": true, "text": spec.title },
            "scales": {
                "xAxes": [{ "stacked": spec.style == ChartStyle::Bar }],
                "yAxes": [{
                    "stacked": spec.style == ChartStyle::Bar,
                    "scaleLabel": { "display": true, "labelString": spec.y_label },
                    "ticks": { "min": 0, "max": max, "stepSize": step },
                }],
            },
        },
    })
}

/// POSTs chart configurations and returns the PNG bytes.
pub struct QuickChartRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl QuickChartRenderer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TauticordError> {
        let client = reqwest::Client::builder()
            .timeout(RENDER_TIMEOUT)
            .build()
            .map_err(|e| TauticordError::Internal(format!("failed to build chart HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for QuickChartRenderer {
    fn name(&self) -> &str {
        "quickchart"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, TauticordError> {
        let body = json!({
            "width": 800,
            "height": 400,
            "format": "png",
            "backgroundColor": "white",
            "chart": chart_config(spec),
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| TauticordError::Upstream {
                message: format!("chart renderer request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, title = %spec.title, "chart renderer responded");
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TauticordError::upstream(format!("chart renderer returned {status}: {text}")));
        }

        let bytes = response.bytes().await.map_err(|e| TauticordError::Upstream {
            message: format!("failed to read chart image: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(bytes.to_vec())
    }
}
