// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook intake server.
//!
//! Handles POST /webhooks/tautulli/recently_added plus the fixed-text
//! liveness routes.

use axum::{
    Json,
    body::Bytes,
    extract::State,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tauticord_storage::RECENTLY_ADDED_WEBHOOK;
use tauticord_storage::queries::webhooks;
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// Library name recorded when the payload carries none.
pub const UNKNOWN_LIBRARY: &str = "Unknown";

/// Discord-style webhook body sent by the monitoring server's notifier.
#[derive(Debug, Default, Deserialize)]
pub struct DiscordWebhook {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub embeds: Vec<WebhookEmbed>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookEmbed {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<WebhookField>,
    #[serde(default)]
    pub footer: Option<WebhookFooter>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WebhookFooter {
    #[serde(default)]
    pub text: String,
}

impl WebhookEmbed {
    fn library_name(&self) -> String {
        self.fields
            .iter()
            .find(|f| f.name.trim().eq_ignore_ascii_case("library"))
            .map(|f| f.value.trim().to_string())
            .or_else(|| self.footer.as_ref().map(|f| f.text.trim().to_string()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_LIBRARY.to_string())
    }
}

impl DiscordWebhook {
    /// `(name, library)` for every embed with a non-empty title.
    pub fn items(&self) -> Vec<(String, String)> {
        self.embeds
            .iter()
            .filter_map(|embed| {
                let title = embed.title.as_deref()?.trim();
                (!title.is_empty()).then(|| (title.to_string(), embed.library_name()))
            })
            .collect()
    }
}

/// POST /webhooks/tautulli/recently_added
///
/// Always answers `200 {}` so the sender does not retry.
pub async fn post_recently_added(State(state): State<GatewayState>, body: Bytes) -> Json<Value> {
    let payload: DiscordWebhook = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "ignoring malformed recently-added webhook");
            return Json(json!({}));
        }
    };

    let items = payload.items();
    if items.is_empty() {
        debug!("recently-added webhook carried no items");
    }
    let count = items.len();
    match webhooks::record_recently_added(&state.db, RECENTLY_ADDED_WEBHOOK, items).await {
        Ok(id) => info!(webhook_id = id, items = count, "recorded recently-added webhook"),
        Err(e) => warn!(error = %e, "failed to record recently-added webhook"),
    }
    Json(json!({}))
}

/// GET /ping
pub async fn get_ping() -> &'static str {
    "Pong!"
}

/// GET /hello
pub async fn get_hello() -> &'static str {
    "Hello, world!"
}

/// GET /health
pub async fn get_health() -> &'static str {
    "Healthy!"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> DiscordWebhook {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn library_comes_from_field_then_footer() {
        let payload = parse(json!({
            "embeds": [
                {"title": "Heat (1995)", "fields": [{"name": "Library", "value": "Movies"}]},
                {"title": "Alien", "footer": {"text": "Sci-Fi"}},
                {"title": "Nameless"}
            ]
        }));
        assert_eq!(
            payload.items(),
            vec![
                ("Heat (1995)".to_string(), "Movies".to_string()),
                ("Alien".to_string(), "Sci-Fi".to_string()),
                ("Nameless".to_string(), UNKNOWN_LIBRARY.to_string()),
            ]
        );
    }

    #[test]
    fn untitled_embeds_are_skipped() {
        let payload = parse(json!({"content": "hi", "embeds": [{"title": "  "}, {"fields": []}]}));
        assert!(payload.items().is_empty());
    }

    #[test]
    fn empty_body_has_no_items() {
        assert!(parse(json!({})).items().is_empty());
    }
}
