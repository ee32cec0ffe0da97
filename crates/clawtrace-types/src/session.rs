use serde::{Deserialize, Serialize};

/// Location of one session's contiguous window inside one log file.
///
/// `byte_offset` points at the first line in the file carrying the session id;
/// `line_count` is how many lines in the file carry it. Entries are a derived,
/// disposable cache; deleting the persisted table only costs a re-scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIndexEntry {
    pub session_id: String,
    pub byte_offset: u64,
    pub line_count: u64,
}

/// Per-session statistics folded out of the process log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub first_ts: String,
    pub last_ts: String,
    pub tool_count: u64,
    pub turns: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agent: String,
}

/// Metadata carried by transcript header events, meaningful only before the
/// first `message` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thinking_level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cwd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_version: Option<u64>,
}
