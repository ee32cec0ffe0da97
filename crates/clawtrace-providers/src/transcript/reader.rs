use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clawtrace_types::SessionMetadata;

use crate::Result;
use super::schema::TranscriptRecord;

/// Transcript file location for a session id.
pub fn session_file_path(sessions_dir: &Path, session_id: &str) -> PathBuf {
    sessions_dir.join(format!("{}.jsonl", session_id))
}

/// Decode one transcript line, skipping blanks and malformed input.
pub fn parse_transcript_line(line: &str) -> Option<TranscriptRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    serde_json::from_str(line).ok()
}

/// Read every decodable record from a transcript file.
///
/// A missing file yields an empty list, not an error; the session may simply
/// not have started yet.
pub fn read_session_records(path: &Path) -> Result<Vec<TranscriptRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        if let Some(record) = parse_transcript_line(&line?) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Fold header events into session metadata.
///
/// Stops at the first `message` event: header records appearing later belong
/// to compaction noise and are not meaningful.
pub fn extract_session_metadata(path: &Path) -> Result<SessionMetadata> {
    let mut metadata = SessionMetadata::default();

    for record in read_session_records(path)? {
        match record {
            TranscriptRecord::Session(header) => {
                metadata.cwd = header.cwd;
                metadata.session_version = header.version;
            }
            TranscriptRecord::ModelChange(change) => {
                metadata.provider = change.provider;
                metadata.model = change.model_id;
            }
            TranscriptRecord::ThinkingLevelChange(change) => {
                metadata.thinking_level = change.thinking_level;
            }
            TranscriptRecord::Message(_) => break,
            TranscriptRecord::Unknown => {}
        }
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_transcript(dir: &Path, session_id: &str, lines: &[&str]) -> PathBuf {
        let path = session_file_path(dir, session_id);
        let mut file = File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = session_file_path(dir.path(), "nope");
        assert!(read_session_records(&path).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_and_blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(
            dir.path(),
            "s1",
            &[
                r#"{"type":"session","cwd":"/work"}"#,
                "",
                "not json",
                r#"{"type":"message","id":"m1","message":{"role":"user","content":[{"type":"text","text":"hi"}]}}"#,
            ],
        );

        let records = read_session_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_metadata_stops_at_first_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_transcript(
            dir.path(),
            "s2",
            &[
                r#"{"type":"session","cwd":"/work","version":2}"#,
                r#"{"type":"model_change","provider":"anthropic","modelId":"claude-sonnet-4"}"#,
                r#"{"type":"thinking_level_change","thinkingLevel":"high"}"#,
                r#"{"type":"message","id":"m1","message":{"role":"user","content":[]}}"#,
                r#"{"type":"model_change","provider":"other","modelId":"late"}"#,
            ],
        );

        let metadata = extract_session_metadata(&path).unwrap();
        assert_eq!(metadata.cwd, "/work");
        assert_eq!(metadata.session_version, Some(2));
        assert_eq!(metadata.provider, "anthropic");
        assert_eq!(metadata.model, "claude-sonnet-4");
        assert_eq!(metadata.thinking_level, "high");
    }
}
