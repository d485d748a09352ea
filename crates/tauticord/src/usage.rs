// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local usage record kept at `--usage` when `Extras.Analytics` is on.
//!
//! Holds a stable install id and start counters. Nothing is sent anywhere.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tauticord_core::TauticordError;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub install_id: Uuid,
    pub version: String,
    pub first_start: DateTime<Utc>,
    pub last_start: DateTime<Utc>,
    pub starts: u64,
}

fn io_error(path: &Path, e: std::io::Error) -> TauticordError {
    TauticordError::Internal(format!("usage file {}: {e}", path.display()))
}

/// Load the record at `path` (starting fresh if it is missing or
/// unreadable), count this start and write it back.
pub fn record_start(path: &Path, version: &str, now: DateTime<Utc>) -> Result<UsageRecord, TauticordError> {
    let previous = std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<UsageRecord>(&raw).ok());

    let record = match previous {
        Some(previous) => UsageRecord {
            version: version.to_string(),
            last_start: now,
            starts: previous.starts + 1,
            ..previous
        },
        None => UsageRecord {
            install_id: Uuid::new_v4(),
            version: version.to_string(),
            first_start: now,
            last_start: now,
            starts: 1,
        },
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(path, e))?;
    }
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| TauticordError::Internal(format!("usage record: {e}")))?;
    std::fs::write(path, json).map_err(|e| io_error(path, e))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn first_start_creates_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/usage.json");
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let record = record_start(&path, "5.0.0", now).unwrap();
        assert_eq!(record.starts, 1);
        assert_eq!(record.first_start, now);
        assert!(path.exists());
    }

    #[test]
    fn later_starts_keep_the_install_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        let first = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let a = record_start(&path, "5.0.0", first).unwrap();
        let b = record_start(&path, "5.1.0", second).unwrap();
        assert_eq!(a.install_id, b.install_id);
        assert_eq!(b.starts, 2);
        assert_eq!(b.first_start, first);
        assert_eq!(b.last_start, second);
        assert_eq!(b.version, "5.1.0");
    }

    #[test]
    fn corrupt_record_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usage.json");
        std::fs::write(&path, "{not json").unwrap();
        let record = record_start(&path, "5.0.0", Utc::now()).unwrap();
        assert_eq!(record.starts, 1);
    }
}
