// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite store for the webhook intake endpoint.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a schema
//! version stamp, a single-writer concurrency model via `tokio-rusqlite`,
//! and typed queries for received webhooks and their recently-added items.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
