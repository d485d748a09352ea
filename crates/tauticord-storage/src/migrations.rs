// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery, plus the schema version
//! stamp.
//!
//! SQL migration files are compiled into the binary at build time via
//! `embed_migrations!`. Migrations run automatically on database open.

use rusqlite::OptionalExtension;
use tauticord_core::TauticordError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Run all pending migrations against the given connection.
///
/// Refinery tracks applied migrations in its own `refinery_schema_history` table.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), TauticordError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| TauticordError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}

/// Compare the stored version with `current` and record `current`.
///
/// A database last written by a newer major version is refused.
pub fn stamp_version(
    conn: &rusqlite::Connection,
    current: &semver::Version,
) -> Result<Option<semver::Version>, TauticordError> {
    let stored: Option<String> = conn
        .query_row("SELECT semver FROM version WHERE id = 1", [], |row| row.get(0))
        .optional()
        .map_err(storage)?;

    let previous = match stored {
        Some(raw) => Some(semver::Version::parse(&raw).map_err(|e| TauticordError::Storage {
            source: format!("stored schema version `{raw}` is not semver: {e}").into(),
        })?),
        None => None,
    };

    if let Some(previous) = &previous
        && previous.major > current.major
    {
        return Err(TauticordError::Storage {
            source: format!(
                "database was written by version {previous}, newer than this build ({current})"
            )
            .into(),
        });
    }

    conn.execute(
        "INSERT INTO version (id, semver) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET semver = excluded.semver",
        rusqlite::params![current.to_string()],
    )
    .map_err(storage)?;

    Ok(previous)
}

fn storage(e: rusqlite::Error) -> TauticordError {
    TauticordError::Storage {
        source: Box::new(e),
    }
}
