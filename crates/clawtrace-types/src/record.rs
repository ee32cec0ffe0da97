use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One log line in canonical flat form.
///
/// Both wire shapes (flat JSON object and metadata-enveloped free text) resolve
/// into this single shape at parse time; nothing downstream ever branches on the
/// source encoding again. Values are carried uninterpreted: a `duration` that is
/// not numeric stays in the map as-is and is the caller's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// The raw field map, for retention on an `Event`.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Stable identity of the session this line belongs to. A record without a
    /// non-empty session id is not indexable and never leaves the parser.
    pub fn session_id(&self) -> &str {
        self.str_field("session_id")
    }

    pub fn tool(&self) -> &str {
        self.str_field("tool")
    }

    pub fn msg(&self) -> &str {
        self.str_field("msg")
    }

    pub fn event(&self) -> &str {
        self.str_field("event")
    }

    pub fn ts(&self) -> &str {
        self.str_field("ts")
    }

    pub fn agent(&self) -> &str {
        self.str_field("agent")
    }

    /// Tool argument mapping, empty when absent or not an object.
    pub fn input(&self) -> Map<String, Value> {
        self.0
            .get("input")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// Tool output as text. Non-string outputs are rendered as JSON.
    pub fn output_text(&self) -> String {
        match self.0.get("output") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.0.get("duration").and_then(Value::as_i64)
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> LogRecord {
        match v {
            Value::Object(map) => LogRecord::from_map(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        let rec = record(json!({
            "session_id": "abc",
            "tool": "exec",
            "input": {"command": "ls"},
            "output": "file.txt",
            "duration": 12
        }));

        assert_eq!(rec.session_id(), "abc");
        assert_eq!(rec.tool(), "exec");
        assert_eq!(rec.input().get("command"), Some(&json!("ls")));
        assert_eq!(rec.output_text(), "file.txt");
        assert_eq!(rec.duration_ms(), Some(12));
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let rec = record(json!({"session_id": "abc"}));
        assert_eq!(rec.tool(), "");
        assert_eq!(rec.ts(), "");
        assert!(rec.input().is_empty());
        assert_eq!(rec.output_text(), "");
        assert_eq!(rec.duration_ms(), None);
    }

    #[test]
    fn test_non_numeric_duration_passes_through() {
        let rec = record(json!({"session_id": "abc", "duration": "fast"}));
        assert_eq!(rec.duration_ms(), None);
        assert_eq!(rec.get("duration"), Some(&json!("fast")));
    }

    #[test]
    fn test_structured_output_rendered_as_json() {
        let rec = record(json!({"session_id": "abc", "output": {"lines": 3}}));
        assert_eq!(rec.output_text(), "{\"lines\":3}");
    }
}
