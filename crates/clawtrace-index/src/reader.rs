use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clawtrace_providers::parse_line;
use clawtrace_types::LogRecord;

use crate::store::IndexStore;
use crate::window::iter_session_lines;

/// Dated-rotation filename pattern: `openclaw-YYYY-MM-DD.log`.
pub const LOG_FILE_PREFIX: &str = "openclaw-";
pub const LOG_FILE_SUFFIX: &str = ".log";

/// All rotated log files in a directory, sorted by name (and thus by date).
pub fn log_files(log_dir: &Path) -> Vec<PathBuf> {
    if !log_dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(log_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(LOG_FILE_PREFIX) && n.ends_with(LOG_FILE_SUFFIX))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}

/// Read one session's records across every log file, index-accelerated.
///
/// `session_prefix` may be an abbreviated id; the index's keys are scanned for
/// prefix matches and each matching session's contiguous window is read. When
/// no index key matches, the file is linearly scanned with a prefix filter on
/// every parsed record — graceful degradation, not an error.
pub fn read_logs_for_session(
    log_dir: &Path,
    store: &IndexStore,
    session_prefix: &str,
) -> Vec<LogRecord> {
    let mut records = Vec::new();

    for log_file in log_files(log_dir) {
        let index = match store.load(&log_file) {
            Ok(index) => index,
            Err(err) => {
                eprintln!("skipping unreadable log file {}: {}", log_file.display(), err);
                continue;
            }
        };

        let matched: Vec<_> = index
            .values()
            .filter(|entry| entry.session_id.starts_with(session_prefix))
            .cloned()
            .collect();

        if !matched.is_empty() {
            for entry in matched {
                let Ok(lines) = iter_session_lines(&log_file, entry.byte_offset, &entry.session_id)
                else {
                    continue;
                };
                for line in lines {
                    if let Some(record) = parse_line(&line) {
                        records.push(record);
                    }
                }
            }
        } else if let Ok(file) = File::open(&log_file) {
            // No index hit: fall back to a full scan of this one file.
            for line in BufReader::new(file).lines().map_while(|l| l.ok()) {
                if let Some(record) = parse_line(&line) {
                    if record.session_id().starts_with(session_prefix) {
                        records.push(record);
                    }
                }
            }
        }
    }

    records
}

/// Read every parseable record from every log file in the directory.
///
/// Files larger than `max_file_size_mb` are skipped with a warning: a full
/// unscoped read of a multi-gigabyte file is a capacity problem, and callers
/// should use the indexed, session-scoped path instead.
pub fn read_all_logs(log_dir: &Path, max_file_size_mb: u64) -> Vec<LogRecord> {
    let mut records = Vec::new();
    let max_bytes = max_file_size_mb * 1024 * 1024;

    for log_file in log_files(log_dir) {
        let size = match fs::metadata(&log_file) {
            Ok(meta) => meta.len(),
            Err(err) => {
                eprintln!("skipping unreadable log file {}: {}", log_file.display(), err);
                continue;
            }
        };

        if size > max_bytes {
            eprintln!(
                "skipping large file: {} ({:.1}MB > {}MB); use a session-scoped read instead",
                log_file.display(),
                size as f64 / 1024.0 / 1024.0,
                max_file_size_mb
            );
            continue;
        }

        let Ok(file) = File::open(&log_file) else {
            continue;
        };
        for line in BufReader::new(file).lines().map_while(|l| l.ok()) {
            if let Some(record) = parse_line(&line) {
                records.push(record);
            }
        }
    }

    records
}
