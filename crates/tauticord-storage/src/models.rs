// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types of the webhook intake store.

use serde::{Deserialize, Serialize};

/// One received webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub id: i64,
    pub webhook_type: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One recently-added item carried by a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentlyAddedRecord {
    pub id: i64,
    pub name: String,
    pub library_name: String,
    pub webhook_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Webhook type recorded for recently-added notifications.
pub const RECENTLY_ADDED_WEBHOOK: &str = "recently_added";

/// Current time in the store's timestamp format.
pub fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
