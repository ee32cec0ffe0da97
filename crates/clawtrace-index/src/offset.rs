use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use clawtrace_providers::parse_line;
use clawtrace_types::SessionIndexEntry;

use crate::{Error, Result};

/// Index contents: session id to its first byte offset and line count within
/// one log file. A `BTreeMap` keeps the persisted table sorted by session id.
pub type SessionIndex = BTreeMap<String, SessionIndexEntry>;

const PROGRESS_INTERVAL: u64 = 500 * 1024 * 1024;

/// Full sequential scan of a log file.
///
/// Offsets are computed from each line's encoded byte length, so multi-byte
/// text cannot skew them. Progress is reported to stderr every 500 MB; a full
/// scan over a multi-gigabyte file is the expected worst case here, not an
/// edge case. The result is persisted to `idx_path` as a sorted TSV.
pub fn build(log_path: &Path, idx_path: &Path) -> Result<SessionIndex> {
    if !log_path.exists() {
        return Ok(SessionIndex::new());
    }

    let file_size = fs::metadata(log_path)?.len();
    let mut index = SessionIndex::new();

    scan_from(log_path, 0, file_size, &mut index)?;
    write_index(idx_path, &index)?;

    Ok(index)
}

/// Load the index for a log file, refreshing it as needed.
///
/// Fresh index (mtime not older than the log's): read verbatim. Stale index:
/// resume scanning from the maximum recorded offset, merging new sessions.
/// Missing index: full build. If the log shrank below the maximum recorded
/// offset it was truncated or rewritten, and the incremental assumption no
/// longer holds; that forces a full rebuild.
pub fn load(log_path: &Path, idx_path: &Path) -> Result<SessionIndex> {
    if !log_path.exists() {
        return Ok(SessionIndex::new());
    }

    let log_meta = fs::metadata(log_path)?;

    if !idx_path.exists() {
        return build(log_path, idx_path);
    }

    let idx_mtime = fs::metadata(idx_path)?.modified()?;
    if idx_mtime >= log_meta.modified()? {
        return read_index(idx_path);
    }

    let mut index = read_index(idx_path)?;
    let resume = index
        .values()
        .map(|entry| entry.byte_offset)
        .max()
        .unwrap_or(0);

    if log_meta.len() < resume {
        return build(log_path, idx_path);
    }

    // The resume point is the first offset of the last indexed session, so
    // that session's window is rescanned from its start; its stale count must
    // not be added to twice.
    for entry in index.values_mut() {
        if entry.byte_offset >= resume {
            entry.line_count = 0;
        }
    }

    eprintln!(
        "incremental scan: {} from {}MB",
        log_path.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
        resume / 1024 / 1024
    );

    scan_from(log_path, resume, log_meta.len(), &mut index)?;
    write_index(idx_path, &index)?;

    Ok(index)
}

/// Scan `log_path` from `start`, folding session offsets and line counts into
/// `index`. First-seen offsets are never overwritten.
fn scan_from(log_path: &Path, start: u64, file_size: u64, index: &mut SessionIndex) -> Result<()> {
    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(start))?;
    let mut reader = BufReader::new(file);

    let mut offset = start;
    let mut last_progress = start;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = parse_line(&line) {
            let session_id = record.session_id();
            if !session_id.is_empty() {
                let entry = index
                    .entry(session_id.to_string())
                    .or_insert_with(|| SessionIndexEntry {
                        session_id: session_id.to_string(),
                        byte_offset: offset,
                        line_count: 0,
                    });
                entry.line_count += 1;
            }
        }

        offset += read as u64;

        if offset - last_progress >= PROGRESS_INTERVAL {
            let percent = if file_size > 0 {
                offset * 100 / file_size
            } else {
                100
            };
            eprintln!(
                "scanning: {} {}% ({}MB / {}MB)",
                log_path.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
                percent,
                offset / 1024 / 1024,
                file_size / 1024 / 1024
            );
            last_progress = offset;
        }
    }

    Ok(())
}

/// Read a persisted index table verbatim.
pub fn read_index(idx_path: &Path) -> Result<SessionIndex> {
    let reader = BufReader::new(File::open(idx_path)?);
    let mut index = SessionIndex::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let (Some(session_id), Some(offset), Some(count)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Parse(format!("malformed index line: {:?}", line)));
        };

        let byte_offset = offset
            .parse::<u64>()
            .map_err(|e| Error::Parse(format!("bad offset {:?}: {}", offset, e)))?;
        let line_count = count
            .parse::<u64>()
            .map_err(|e| Error::Parse(format!("bad line count {:?}: {}", count, e)))?;

        index.insert(
            session_id.to_string(),
            SessionIndexEntry {
                session_id: session_id.to_string(),
                byte_offset,
                line_count,
            },
        );
    }

    Ok(index)
}

/// Rewrite the index table wholesale, sorted by session id.
fn write_index(idx_path: &Path, index: &SessionIndex) -> Result<()> {
    if let Some(parent) = idx_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(idx_path)?);
    for entry in index.values() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            entry.session_id, entry.byte_offset, entry.line_count
        )?;
    }
    writer.flush()?;

    Ok(())
}
