// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tauticord_core::TauticordError;
use tracing::{debug, info};

/// Convert a tokio-rusqlite error into `TauticordError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> TauticordError {
    TauticordError::Storage {
        source: Box::new(e),
    }
}

/// Unwrap an error raised inside a `call` closure that already returns
/// `TauticordError`.
fn flatten(e: tokio_rusqlite::Error<TauticordError>) -> TauticordError {
    match e {
        tokio_rusqlite::Error::Error(inner) => inner,
        other => TauticordError::Storage {
            source: other.to_string().into(),
        },
    }
}

/// Handle to the webhook intake database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, run migrations
    /// and stamp the schema version with `version`.
    pub async fn open(path: &str, version: &semver::Version) -> Result<Self, TauticordError> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent).map_err(|e| TauticordError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| TauticordError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let version = version.clone();
        let previous = conn
            .call(move |conn| {
                crate::migrations::run_migrations(conn)?;
                crate::migrations::stamp_version(conn, &version)
            })
            .await
            .map_err(flatten)?;

        match previous {
            Some(previous) => debug!(path, %previous, "database opened"),
            None => info!(path, "database created"),
        }

        Ok(Self { conn })
    }

    /// Open a private in-memory database, mainly for tests.
    pub async fn open_in_memory() -> Result<Self, TauticordError> {
        Self::open(":memory:", &semver::Version::new(0, 0, 0)).await
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), TauticordError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)
    }
}
