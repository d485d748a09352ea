// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and recently-added item queries.

use rusqlite::params;
use tauticord_core::TauticordError;

use crate::database::{Database, map_tr_err};
use crate::models::{RecentlyAddedRecord, WebhookRecord, now_timestamp};

/// Insert a webhook row and return its id.
pub async fn insert_webhook(db: &Database, webhook_type: &str) -> Result<i64, TauticordError> {
    let webhook_type = webhook_type.to_string();
    db.connection()
        .call(move |conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO webhooks (webhook_type, created_at, updated_at) VALUES (?1, ?2, ?2)",
                params![webhook_type, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert one recently-added item belonging to `webhook_id`.
pub async fn insert_recently_added(
    db: &Database,
    name: &str,
    library_name: &str,
    webhook_id: i64,
) -> Result<i64, TauticordError> {
    let name = name.to_string();
    let library_name = library_name.to_string();
    db.connection()
        .call(move |conn| {
            let now = now_timestamp();
            conn.execute(
                "INSERT INTO recently_added_items (name, library_name, webhook_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![name, library_name, webhook_id, now],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Record one webhook with all of its items in a single transaction.
///
/// Returns the webhook id.
pub async fn record_recently_added(
    db: &Database,
    webhook_type: &str,
    items: Vec<(String, String)>,
) -> Result<i64, TauticordError> {
    let webhook_type = webhook_type.to_string();
    db.connection()
        .call(move |conn| {
            let now = now_timestamp();
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO webhooks (webhook_type, created_at, updated_at) VALUES (?1, ?2, ?2)",
                params![webhook_type, now],
            )?;
            let webhook_id = tx.last_insert_rowid();
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO recently_added_items (name, library_name, webhook_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)",
                )?;
                for (name, library_name) in &items {
                    stmt.execute(params![name, library_name, webhook_id, now])?;
                }
            }
            tx.commit()?;
            Ok(webhook_id)
        })
        .await
        .map_err(map_tr_err)
}

/// Most recently recorded items, newest first.
pub async fn recent_items(
    db: &Database,
    limit: i64,
) -> Result<Vec<RecentlyAddedRecord>, TauticordError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, library_name, webhook_id, created_at, updated_at
                 FROM recently_added_items
                 ORDER BY created_at DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(RecentlyAddedRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    library_name: row.get(2)?,
                    webhook_id: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            })?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a webhook by id.
pub async fn get_webhook(db: &Database, id: i64) -> Result<Option<WebhookRecord>, TauticordError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, webhook_type, created_at, updated_at FROM webhooks WHERE id = ?1",
            )?;
            let mut rows = stmt.query_map(params![id], |row| {
                Ok(WebhookRecord {
                    id: row.get(0)?,
                    webhook_type: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of webhooks received.
pub async fn count_webhooks(db: &Database) -> Result<i64, TauticordError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM webhooks", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
