use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Semantic kind of a reconstructed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ToolStart,
    ToolEnd,
    LlmResponse,
}

/// The canonical unit handed to every consumer of a trace.
///
/// Empty and absent attributes are omitted from serialized output so that a
/// rendered event carries only what the underlying records actually said.
/// `raw` retains the originating record for debugging and is never
/// reinterpreted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,

    /// Tool name; empty for `llm_response`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool: String,

    /// Argument mapping. For a `tool_end` this is copied from the paired
    /// start record when pairing succeeded, and stays empty otherwise.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub input: Map<String, Value>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,

    /// `tool_end` only; taken from the end record, or computed from elapsed
    /// wall time for transcript calls whose own duration is missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,

    /// ISO-8601 string, caller-supplied, not validated here.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ts: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub session_id: String,

    /// Free-form lifecycle status for long-running tools ("running",
    /// "completed", "error").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,

    /// Free-text reasoning from the turn's assistant messages up to and
    /// including the calling message, newline-joined. Empty when the turn had
    /// no text, never absent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plan_text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub usage: Map<String, Value>,

    /// Originating record, retained for debugging.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl Event {
    /// An event of the given kind with every attribute empty.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            tool: String::new(),
            input: Map::new(),
            output: String::new(),
            duration_ms: None,
            ts: String::new(),
            session_id: String::new(),
            status: String::new(),
            exit_code: None,
            plan_text: String::new(),
            model: String::new(),
            usage: Map::new(),
            raw: Value::Null,
        }
    }
}
