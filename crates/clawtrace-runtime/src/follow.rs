//! Cooperative poll tail of the dated process log.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clawtrace_index::{LOG_FILE_PREFIX, LOG_FILE_SUFFIX};

/// Sleep between empty reads.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Sleep while waiting for a missing target file to appear.
pub const CREATE_WAIT_INTERVAL: Duration = Duration::from_millis(500);

/// Dated log file path for one day: `<dir>/openclaw-YYYY-MM-DD.log`.
pub fn dated_log_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!(
        "{}{}{}",
        LOG_FILE_PREFIX,
        date.format("%Y-%m-%d"),
        LOG_FILE_SUFFIX
    ))
}

/// Tails today's dated log file, yielding complete appended lines.
///
/// Three forms of file change are recovered transparently: day rollover to the
/// next dated file, inode change at the same path, and deletion followed by
/// recreation. A line is held back until its trailing newline has been
/// flushed, so the writer's partial flushes never surface downstream.
///
/// The iterator ends only when the shared stop flag is set; the flag is
/// checked once per poll cycle, never mid-read.
pub struct LogFollower {
    log_dir: PathBuf,
    path: PathBuf,
    date: NaiveDate,
    reader: Option<BufReader<File>>,
    file_id: u64,
    from_end: bool,
    attached_once: bool,
    stop: Arc<AtomicBool>,
    buf: Vec<u8>,
}

impl LogFollower {
    /// Follow today's log file under `log_dir`.
    ///
    /// With `from_end` the first attach seeks past existing content, so only
    /// lines appended afterwards are delivered; reattaches after rotation or
    /// recreation always read from the start of the new file.
    pub fn attach(log_dir: impl Into<PathBuf>, from_end: bool, stop: Arc<AtomicBool>) -> Self {
        let log_dir = log_dir.into();
        let date = Local::now().date_naive();
        let path = dated_log_path(&log_dir, date);
        Self {
            log_dir,
            path,
            date,
            reader: None,
            file_id: 0,
            from_end,
            attached_once: false,
            stop,
            buf: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn open(&mut self) -> bool {
        let Ok(mut file) = File::open(&self.path) else {
            return false;
        };
        if self.from_end && !self.attached_once && file.seek(SeekFrom::End(0)).is_err() {
            return false;
        }
        self.attached_once = true;
        self.file_id = file_id(&self.path);
        self.reader = Some(BufReader::new(file));
        self.buf.clear();
        true
    }

    /// Block until the target file exists or the stop flag is set.
    fn wait_for_file(&mut self) -> bool {
        loop {
            if self.stopped() {
                return false;
            }
            if self.open() {
                return true;
            }
            thread::sleep(CREATE_WAIT_INTERVAL);
        }
    }

    /// Pull one complete line from the current reader, accumulating partial
    /// trailing content until its newline arrives.
    fn read_line(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        match reader.read_until(b'\n', &mut self.buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    let line = String::from_utf8_lossy(&self.buf).into_owned();
                    self.buf.clear();
                    Some(line)
                } else {
                    None
                }
            }
        }
    }

    fn check_rotation(&mut self) {
        // Day rollover: switch once the next dated file exists.
        let today = Local::now().date_naive();
        if today != self.date {
            let next = dated_log_path(&self.log_dir, today);
            if next.exists() {
                self.date = today;
                self.path = next;
                self.reader = None;
                self.open();
                return;
            }
        }

        match std::fs::metadata(&self.path) {
            Ok(_) => {
                // Same path, different file: rotated in place.
                if file_id(&self.path) != self.file_id {
                    self.reader = None;
                    self.open();
                }
            }
            Err(_) => {
                // Deleted; the poll loop falls back to waiting for recreation.
                self.reader = None;
            }
        }
    }
}

impl Iterator for LogFollower {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.stopped() {
                return None;
            }

            if self.reader.is_none() && !self.wait_for_file() {
                return None;
            }

            if let Some(line) = self.read_line() {
                return Some(line);
            }

            thread::sleep(POLL_INTERVAL);
            self.check_rotation();
        }
    }
}

#[cfg(unix)]
fn file_id(path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).map(|m| m.ino()).unwrap_or(0)
}

#[cfg(not(unix))]
fn file_id(_path: &Path) -> u64 {
    0
}
