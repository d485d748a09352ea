// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console and file logging.
//!
//! The file layer writes `tauticord.log` through [`RotatingFile`], which
//! rolls the file over by size and keeps a fixed number of old files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE_NAME: &str = "tauticord.log";

/// Roll over once the file reaches 5 MB.
pub const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;

/// Old files kept as `tauticord.log.1` … `tauticord.log.5`.
pub const KEPT_LOG_FILES: usize = 5;

const DEFAULT_FILTER: &str = "tauticord=info,warn";

/// A log file that rotates once it would exceed `max_bytes`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    keep: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open (appending to) `dir/name`, creating `dir` when needed.
    pub fn open(dir: &Path, name: &str, max_bytes: u64, keep: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            keep,
            file,
            written,
        })
    }

    fn numbered(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.keep == 0 {
            self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.numbered(self.keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.keep).rev() {
            let from = self.numbered(n);
            if from.exists() {
                fs::rename(&from, self.numbered(n + 1))?;
            }
        }
        fs::rename(&self.path, self.numbered(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Install the console layer and, when `log_dir` is writable, the rotating
/// file layer. `RUST_LOG` overrides the default filter.
///
/// The returned guard flushes the file writer on drop and must live for the
/// whole process.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let console = fmt::layer().with_target(true).with_writer(io::stderr);

    match RotatingFile::open(log_dir, LOG_FILE_NAME, MAX_LOG_BYTES, KEPT_LOG_FILES) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let file_layer = fmt::layer().with_ansi(false).with_target(true).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file_layer)
                .init();
            tracing::debug!(dir = %log_dir.display(), "file logging enabled");
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(filter).with(console).init();
            tracing::warn!(dir = %log_dir.display(), error = %e, "cannot write log files, logging to console only");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn appends_until_the_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RotatingFile::open(dir.path(), "t.log", 10, 2).unwrap();
        file.write_all(b"12345").unwrap();
        file.write_all(b"67890").unwrap();
        assert_eq!(read(dir.path().join("t.log")), "1234567890");
        assert!(!dir.path().join("t.log.1").exists());
    }

    #[test]
    fn rotates_and_keeps_a_fixed_number_of_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RotatingFile::open(dir.path(), "t.log", 4, 2).unwrap();
        for line in ["aaaa", "bbbb", "cccc", "dddd"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();
        assert_eq!(read(dir.path().join("t.log")), "dddd");
        assert_eq!(read(dir.path().join("t.log.1")), "cccc");
        assert_eq!(read(dir.path().join("t.log.2")), "bbbb");
        assert!(!dir.path().join("t.log.3").exists());
    }

    #[test]
    fn reopening_continues_the_size_count() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut file = RotatingFile::open(dir.path(), "t.log", 6, 1).unwrap();
            file.write_all(b"abcd").unwrap();
        }
        let mut file = RotatingFile::open(dir.path(), "t.log", 6, 1).unwrap();
        file.write_all(b"efgh").unwrap();
        assert_eq!(read(dir.path().join("t.log.1")), "abcd");
        assert_eq!(read(dir.path().join("t.log")), "efgh");
    }

    #[test]
    fn oversized_first_write_is_not_rotated_away() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RotatingFile::open(dir.path(), "t.log", 2, 1).unwrap();
        file.write_all(b"longer than the limit").unwrap();
        assert_eq!(read(dir.path().join("t.log")), "longer than the limit");
    }
}
