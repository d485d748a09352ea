// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hourly check for a newer release.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tauticord_core::TauticordError;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::service::RefreshService;

pub const RELEASES_URL: &str = "https://api.github.com/repos/nwithan8/tauticord/releases/latest";

pub const VERSION_CHECK_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    html_url: String,
}

/// Parse a release tag such as `v5.1.0` or `5.1`.
pub fn parse_tag(tag: &str) -> Option<semver::Version> {
    let trimmed = tag.trim().trim_start_matches(['v', 'V']);
    if let Ok(version) = semver::Version::parse(trimmed) {
        return Some(version);
    }
    let mut parts = trimmed.split('.').map(|p| p.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().unwrap_or(Ok(0)).ok()?;
    let patch = parts.next().unwrap_or(Ok(0)).ok()?;
    Some(semver::Version::new(major, minor, patch))
}

/// Warns once per newer release.
pub struct VersionChecker {
    client: reqwest::Client,
    url: String,
    running: semver::Version,
    announced: Mutex<Option<semver::Version>>,
}

impl VersionChecker {
    pub fn new(url: impl Into<String>, running: semver::Version) -> Result<Self, TauticordError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(format!("tauticord/{running}"))
            .build()
            .map_err(|e| TauticordError::Internal(format!("failed to build version-check HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
            running,
            announced: Mutex::new(None),
        })
    }

    async fn latest(&self) -> Result<Release, TauticordError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TauticordError::Upstream {
                message: format!("release check failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TauticordError::upstream(format!("release check returned {status}")));
        }
        response.json::<Release>().await.map_err(|e| TauticordError::Upstream {
            message: format!("invalid release response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Check once; returns the newer version when it was announced now.
    pub async fn check(&self) -> Result<Option<semver::Version>, TauticordError> {
        let release = self.latest().await?;
        let Some(latest) = parse_tag(&release.tag_name) else {
            debug!(tag = %release.tag_name, "unparseable release tag");
            return Ok(None);
        };
        if latest <= self.running {
            debug!(latest = %latest, "running the latest release");
            return Ok(None);
        }
        let mut announced = self.announced.lock().await;
        if announced.as_ref() == Some(&latest) {
            return Ok(None);
        }
        warn!(
            running = %self.running,
            latest = %latest,
            url = %release.html_url,
            "a newer Tauticord release is available"
        );
        *announced = Some(latest.clone());
        Ok(Some(latest))
    }
}

#[async_trait]
impl RefreshService for VersionChecker {
    fn name(&self) -> &str {
        "version-check"
    }

    fn interval(&self) -> Duration {
        VERSION_CHECK_INTERVAL
    }

    async fn tick(&self) -> Result<(), TauticordError> {
        self.check().await.map(|_| ())
    }
}
