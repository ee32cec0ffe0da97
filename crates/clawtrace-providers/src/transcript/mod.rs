//! Per-session transcript source.
//!
//! Transcripts are newline-delimited JSON under the agent's sessions
//! directory, one file per session, named by session id. Header events
//! (`session`, `model_change`, `thinking_level_change`) are only meaningful
//! before the first `message` event.

mod reader;
mod schema;

pub use reader::{
    extract_session_metadata, parse_transcript_line, read_session_records, session_file_path,
};
pub use schema::{
    MessageBody, MessageRecord, ModelChange, Role, Segment, SessionHeader, ThinkingLevelChange,
    ToolDetails, TranscriptRecord,
};
