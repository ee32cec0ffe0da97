use clawtrace_types::{EventKind, LogRecord};
use serde_json::Value;

/// Messages that mark the start of a tool invocation (exact match).
pub const TOOL_START_MSGS: &[&str] = &["embedded run tool start", "tool_start", "run tool start"];

/// Messages that mark the end of a tool invocation (exact match).
pub const TOOL_END_MSGS: &[&str] = &["embedded run tool end", "tool_end", "run tool end"];

/// Turn-boundary phrases. Matched by substring since the runtime emits several
/// free-text variants.
pub const TURN_END_MSGS: &[&str] = &[
    "run finished",
    "agent done",
    "run complete",
    "turn end",
    "response sent",
];

/// Alternate output-bearing keys that flag an `llm_response` candidate.
pub const RESPONSE_KEYS: &[&str] = &["response", "answer", "content"];

const TOOL_START_EVENT: &str = "agent.run.tool_start";
const TOOL_END_EVENT: &str = "agent.run.tool_end";

pub fn is_tool_start(record: &LogRecord) -> bool {
    TOOL_START_MSGS.contains(&record.msg()) || record.event() == TOOL_START_EVENT
}

pub fn is_tool_end(record: &LogRecord) -> bool {
    TOOL_END_MSGS.contains(&record.msg()) || record.event() == TOOL_END_EVENT
}

pub fn is_turn_end(record: &LogRecord) -> bool {
    let msg = record.msg();
    TURN_END_MSGS.iter().any(|end| msg.contains(end))
}

/// Response text carried by one of the alternate output keys, if any.
///
/// Non-string values are rendered as JSON; empty values fall through to the
/// next key, matching the first-truthy-key semantics of the log writer.
pub fn response_text(record: &LogRecord) -> Option<String> {
    for key in RESPONSE_KEYS {
        let text = match record.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

/// Map a canonical record to its semantic event kind.
///
/// This is the single classification function; every consumer goes through it.
/// The response-key rule is an OR with the msg-based checks, not a fallback,
/// and is a known precision tradeoff: a record carrying a `content` key for
/// unrelated reasons will classify as `llm_response`.
pub fn classify(record: &LogRecord) -> Option<EventKind> {
    if is_tool_start(record) {
        Some(EventKind::ToolStart)
    } else if is_tool_end(record) {
        Some(EventKind::ToolEnd)
    } else if response_text(record).is_some() {
        Some(EventKind::LlmResponse)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> LogRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_tool_start_by_msg() {
        for msg in TOOL_START_MSGS {
            let rec = record(json!({"msg": msg, "session_id": "s"}));
            assert_eq!(classify(&rec), Some(EventKind::ToolStart), "msg={}", msg);
        }
    }

    #[test]
    fn test_tool_end_by_event_field() {
        let rec = record(json!({"event": "agent.run.tool_end", "session_id": "s"}));
        assert_eq!(classify(&rec), Some(EventKind::ToolEnd));
    }

    #[test]
    fn test_msg_matching_is_exact_not_substring() {
        let rec = record(json!({"msg": "a tool_start happened", "session_id": "s"}));
        assert!(!is_tool_start(&rec));
        assert_eq!(classify(&rec), None);
    }

    #[test]
    fn test_turn_end_matches_substring_variants() {
        let rec = record(json!({"msg": "embedded run finished in 3s", "session_id": "s"}));
        assert!(is_turn_end(&rec));

        let rec = record(json!({"msg": "response sent", "session_id": "s"}));
        assert!(is_turn_end(&rec));
    }

    #[test]
    fn test_llm_response_by_any_output_key() {
        for key in RESPONSE_KEYS {
            let rec = record(json!({key.to_string(): "hello", "session_id": "s"}));
            assert_eq!(classify(&rec), Some(EventKind::LlmResponse), "key={}", key);
        }
    }

    #[test]
    fn test_empty_response_value_falls_through() {
        let rec = record(json!({"response": "", "answer": "real", "session_id": "s"}));
        assert_eq!(response_text(&rec).as_deref(), Some("real"));

        let rec = record(json!({"response": "", "session_id": "s"}));
        assert_eq!(classify(&rec), None);
    }

    #[test]
    fn test_structured_response_rendered_as_json() {
        let rec = record(json!({"content": {"parts": 2}, "session_id": "s"}));
        assert_eq!(response_text(&rec).as_deref(), Some("{\"parts\":2}"));
    }

    #[test]
    fn test_uninteresting_record_classifies_to_none() {
        let rec = record(json!({"msg": "heartbeat", "session_id": "s"}));
        assert_eq!(classify(&rec), None);
    }
}
