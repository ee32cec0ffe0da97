//! Temporary log and transcript directories for tests.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch process-log directory holding dated `openclaw-*.log` files.
pub struct LogDir {
    root: TempDir,
}

impl LogDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of the dated log file, e.g. `file("2025-01-15")`.
    pub fn file(&self, date: &str) -> PathBuf {
        self.root.path().join(format!("openclaw-{}.log", date))
    }

    /// Append lines (newline-terminated) to the dated log file.
    pub fn append(&self, date: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.file(date);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for line in lines {
            writeln!(file, "{}", line)?;
        }
        file.sync_all()?;
        Ok(path)
    }
}

/// A scratch sessions directory holding per-session transcript files.
pub struct TranscriptDir {
    root: TempDir,
}

impl TranscriptDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn file(&self, session_id: &str) -> PathBuf {
        self.root.path().join(format!("{}.jsonl", session_id))
    }

    pub fn append(&self, session_id: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.file(session_id);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for line in lines {
            writeln!(file, "{}", line)?;
        }
        file.sync_all()?;
        Ok(path)
    }
}

/// Shift a file's mtime by `delta_secs` (negative moves it into the past).
///
/// Index staleness is decided by mtime comparison, so tests need to move
/// clocks without sleeping.
pub fn shift_mtime(path: &Path, delta_secs: i64) -> Result<()> {
    let meta = std::fs::metadata(path)?;
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    let shifted =
        filetime::FileTime::from_unix_time(mtime.unix_seconds() + delta_secs, mtime.nanoseconds());
    filetime::set_file_mtime(path, shifted)?;
    Ok(())
}
