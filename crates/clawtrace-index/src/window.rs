use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use clawtrace_providers::parse_line;

use crate::Result;

/// Lazy reader over one session's contiguous window of raw lines.
///
/// Starting at the indexed offset, lines carrying the target session id are
/// yielded; the first line carrying a *different* id terminates the window
/// (same-session lines are contiguous in the append-only log); lines with no
/// extractable id belong to no session and are skipped. Finite and not
/// restartable.
pub struct SessionLines {
    reader: Option<BufReader<File>>,
    target: String,
    buf: Vec<u8>,
}

/// Stream the lines of `target_session_id` from `offset` onward.
///
/// A missing log file yields an empty sequence.
pub fn iter_session_lines(
    log_path: &Path,
    offset: u64,
    target_session_id: &str,
) -> Result<SessionLines> {
    let reader = if log_path.exists() {
        let mut file = File::open(log_path)?;
        file.seek(SeekFrom::Start(offset))?;
        Some(BufReader::new(file))
    } else {
        None
    };

    Ok(SessionLines {
        reader,
        target: target_session_id.to_string(),
        buf: Vec::new(),
    })
}

impl Iterator for SessionLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;

        loop {
            self.buf.clear();
            match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) | Err(_) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
            }

            let line = String::from_utf8_lossy(&self.buf).into_owned();
            let Some(record) = parse_line(&line) else {
                continue;
            };

            let session_id = record.session_id();
            if session_id.is_empty() {
                continue;
            }
            if session_id == self.target {
                return Some(line);
            }

            // Different session: the window is over.
            self.reader = None;
            return None;
        }
    }
}
