// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only migration markers.
//!
//! Each migration owns `.migration_{NNN}` in the migration data directory.
//! Every line is either an RFC 3339 timestamp (applied) or `undone`; the
//! last line decides.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tauticord_core::TauticordError;

const UNDONE: &str = "undone";

#[derive(Debug, Clone)]
pub struct Ledger {
    dir: PathBuf,
}

impl Ledger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn marker_path(&self, number: u32) -> PathBuf {
        self.dir.join(format!(".migration_{number:03}"))
    }

    /// True when the last entry for `number` is a timestamp.
    pub fn is_done(&self, number: u32) -> bool {
        match std::fs::read_to_string(self.marker_path(number)) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .last()
                .is_some_and(|l| l != UNDONE),
            Err(_) => false,
        }
    }

    /// All entries recorded for `number`, oldest first.
    pub fn entries(&self, number: u32) -> Vec<String> {
        std::fs::read_to_string(self.marker_path(number))
            .map(|c| {
                c.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn mark_done(&self, number: u32) -> Result<(), TauticordError> {
        self.append(number, &chrono::Utc::now().to_rfc3339())
    }

    pub fn mark_undone(&self, number: u32) -> Result<(), TauticordError> {
        self.append(number, UNDONE)
    }

    fn append(&self, number: u32, line: &str) -> Result<(), TauticordError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(number, &self.dir, e))?;
        let path = self.marker_path(number);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_error(number, &path, e))?;
        writeln!(file, "{line}").map_err(|e| io_error(number, &path, e))
    }
}

fn io_error(number: u32, path: &Path, err: std::io::Error) -> TauticordError {
    TauticordError::Migration {
        number,
        message: format!("cannot write {}: {err}", path.display()),
    }
}
