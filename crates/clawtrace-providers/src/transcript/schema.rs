use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One line of a session transcript file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptRecord {
    #[serde(rename = "session")]
    Session(SessionHeader),

    #[serde(rename = "model_change")]
    ModelChange(ModelChange),

    #[serde(rename = "thinking_level_change")]
    ThinkingLevelChange(ThinkingLevelChange),

    #[serde(rename = "message")]
    Message(MessageRecord),

    /// Record types this reader does not interpret.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHeader {
    #[serde(default)]
    pub cwd: String,

    #[serde(default)]
    pub version: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelChange {
    #[serde(default)]
    pub provider: String,

    #[serde(default, rename = "modelId")]
    pub model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingLevelChange {
    #[serde(default, rename = "thinkingLevel")]
    pub thinking_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default, rename = "parentId")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub timestamp: String,

    pub message: MessageBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub content: Vec<Segment>,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub usage: Map<String, Value>,

    /// `toolResult` messages only.
    #[serde(default, rename = "toolName")]
    pub tool_name: String,

    #[serde(default, rename = "toolCallId")]
    pub tool_call_id: String,

    #[serde(default)]
    pub details: ToolDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    ToolResult,
    Unknown,
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown
    }
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::ToolResult => "toolResult",
            Role::Unknown => "unknown",
        }
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "toolResult" => Role::ToolResult,
            _ => Role::Unknown,
        })
    }
}

/// Execution details attached to a `toolResult` message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolDetails {
    #[serde(default, rename = "durationMs")]
    pub duration_ms: Option<i64>,

    #[serde(default)]
    pub status: String,

    #[serde(default, rename = "exitCode")]
    pub exit_code: Option<i64>,
}

/// Structured content segment of a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Segment {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },

    #[serde(rename = "toolCall")]
    ToolCall {
        #[serde(default)]
        id: String,

        #[serde(default)]
        name: String,

        #[serde(default)]
        arguments: Map<String, Value>,
    },

    #[serde(other)]
    Unknown,
}
