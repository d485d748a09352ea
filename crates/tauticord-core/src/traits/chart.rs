// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chart rendering collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TauticordError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChartSeries;

/// Visual style of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    Bar,
    Line,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub style: ChartStyle,
    pub series: ChartSeries,
    pub y_label: String,
    /// Y-axis tick values, computed by the caller.
    pub y_ticks: Vec<f64>,
}

/// Renders a [`ChartSpec`] to a PNG image.
#[async_trait]
pub trait ChartRenderer: PluginAdapter {
    async fn render(&self, spec: &ChartSpec) -> Result<Vec<u8>, TauticordError>;
}
