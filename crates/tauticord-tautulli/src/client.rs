// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Tautulli API v2.
//!
//! Provides [`TautulliClient`] which builds `{URL}/api/v2?apikey=..&cmd=..`
//! requests, unwraps the `response` envelope and maps every failure to
//! [`TauticordError::Upstream`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use tauticord_core::TauticordError;
use tracing::debug;

use crate::types::Envelope;

/// Request timeout for every API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of a call whose envelope may legitimately report `error`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Success(serde_json::Value),
    /// The API answered but declined, with its message.
    Declined(String),
}

/// Low-level HTTP client for Tautulli.
#[derive(Debug, Clone)]
pub struct TautulliClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TautulliClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `base_url` - Tautulli root URL, e.g. `http://tautulli:8181`
    /// * `api_key` - API key from Tautulli's web settings
    /// * `accept_invalid_certs` - skip TLS verification for self-signed setups
    pub fn new(
        base_url: &str,
        api_key: &str,
        accept_invalid_certs: bool,
    ) -> Result<Self, TauticordError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| TauticordError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Root URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full request URL for `cmd` with extra query parameters.
    pub fn command_url(&self, cmd: &str, params: &[(&str, String)]) -> Result<url::Url, TauticordError> {
        let mut query: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str()), ("cmd", cmd)];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
        url::Url::parse_with_params(&format!("{}/api/v2", self.base_url), &query).map_err(|e| {
            TauticordError::Upstream {
                message: format!("invalid Tautulli URL {}: {e}", self.base_url),
                source: Some(Box::new(e)),
            }
        })
    }

    /// Call `cmd`, returning the envelope's `data` or the API's refusal.
    pub async fn call_raw(
        &self,
        cmd: &str,
        params: &[(&str, String)],
    ) -> Result<CallOutcome, TauticordError> {
        let url = self.command_url(cmd, params)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TauticordError::Upstream {
                message: format!("{cmd}: HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, cmd, body = %body, "Tautulli returned an error status");
            return Err(TauticordError::upstream(format!(
                "{cmd}: HTTP {status}"
            )));
        }

        let envelope: Envelope = response.json().await.map_err(|e| TauticordError::Upstream {
            message: format!("{cmd}: failed to parse response: {e}"),
            source: Some(Box::new(e)),
        })?;

        let body = envelope.response;
        if body.is_success() {
            Ok(CallOutcome::Success(body.data))
        } else {
            let message = body.message.unwrap_or_else(|| "no message".to_string());
            debug!(cmd, result = %body.result, message = %message, "Tautulli declined request");
            Ok(CallOutcome::Declined(message))
        }
    }

    /// Call `cmd` and deserialize `data` into `T`; a declined call is an error.
    pub async fn call<T: DeserializeOwned>(
        &self,
        cmd: &str,
        params: &[(&str, String)],
    ) -> Result<T, TauticordError> {
        match self.call_raw(cmd, params).await? {
            CallOutcome::Success(data) => {
                // Several commands answer an empty result with `null` data.
                let data = if data.is_null() {
                    serde_json::Value::Object(Default::default())
                } else {
                    data
                };
                serde_json::from_value(data).map_err(|e| TauticordError::Upstream {
                    message: format!("{cmd}: unexpected data shape: {e}"),
                    source: Some(Box::new(e)),
                })
            }
            CallOutcome::Declined(message) => {
                Err(TauticordError::upstream(format!("{cmd}: {message}")))
            }
        }
    }

    /// Plain GET of an arbitrary URL; returns the status code.
    pub async fn probe(&self, url: &str) -> Result<reqwest::StatusCode, TauticordError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TauticordError::Upstream {
                message: format!("probe of {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(response.status())
    }
}
