//! Poll-based follower for a directory of per-session transcripts.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;

use anyhow::Result;
use clawtrace_providers::transcript::{parse_transcript_line, TranscriptRecord};

use crate::follow::POLL_INTERVAL;

/// Only this many most-recently-modified files are read per poll; an idle
/// session's file ages out of the set on its own.
pub const MAX_TRACKED_FILES: usize = 5;

/// Follows every transcript in a sessions directory.
///
/// Each poll visits the most-recently-modified files, resuming from a byte
/// cursor per file. Delivered message ids are remembered, so a cursor that
/// went stale (the file shrank or was replaced) re-reads from the start
/// without re-delivering anything.
pub struct SessionDirFollower {
    dir: PathBuf,
    cursors: HashMap<PathBuf, u64>,
    processed: HashSet<String>,
    stop: Arc<AtomicBool>,
}

impl SessionDirFollower {
    pub fn new(dir: impl Into<PathBuf>, stop: Arc<AtomicBool>) -> Self {
        Self {
            dir: dir.into(),
            cursors: HashMap::new(),
            processed: HashSet::new(),
            stop,
        }
    }

    /// One poll cycle: new records from the most recently modified files.
    ///
    /// A missing directory yields no records; it may simply not exist yet.
    pub fn poll_once(&mut self) -> Result<Vec<TranscriptRecord>> {
        let mut records = Vec::new();
        for path in recent_transcripts(&self.dir, MAX_TRACKED_FILES) {
            if let Err(err) = self.read_file(&path, &mut records) {
                // A file deleted between listing and reading is not fatal.
                eprintln!("skipping transcript {}: {}", path.display(), err);
            }
        }
        Ok(records)
    }

    /// Poll until the stop flag is set, handing each new record to `on_record`.
    pub fn run(&mut self, mut on_record: impl FnMut(&TranscriptRecord)) -> Result<()> {
        while !self.stop.load(Ordering::Relaxed) {
            for record in self.poll_once()? {
                on_record(&record);
            }
            thread::sleep(POLL_INTERVAL);
        }
        Ok(())
    }

    fn read_file(&mut self, path: &Path, records: &mut Vec<TranscriptRecord>) -> Result<()> {
        let len = std::fs::metadata(path)?.len();
        let cursor = self.cursors.entry(path.to_path_buf()).or_insert(0);
        if *cursor > len {
            // The file shrank under us; the processed set guards re-delivery.
            *cursor = 0;
        }

        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(*cursor))?;
        let mut reader = BufReader::new(file);

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader.read_until(b'\n', &mut buf)?;
            if n == 0 || buf.last() != Some(&b'\n') {
                // Incomplete trailing line: leave the cursor before it.
                break;
            }
            *cursor += n as u64;

            let line = String::from_utf8_lossy(&buf);
            let Some(record) = parse_transcript_line(&line) else {
                continue;
            };

            if let TranscriptRecord::Message(msg) = &record {
                if !msg.id.is_empty() && !self.processed.insert(msg.id.clone()) {
                    continue;
                }
            }
            records.push(record);
        }

        Ok(())
    }
}

/// The `n` most recently modified `.jsonl` files under `dir`.
fn recent_transcripts(dir: &Path, n: usize) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<(PathBuf, SystemTime)> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
        .filter_map(|p| {
            let mtime = std::fs::metadata(&p).and_then(|m| m.modified()).ok()?;
            Some((p, mtime))
        })
        .collect();

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.truncate(n);
    files.into_iter().map(|(p, _)| p).collect()
}
