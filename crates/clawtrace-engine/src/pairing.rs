use std::collections::HashMap;

use clawtrace_providers::classify;
use clawtrace_types::{Event, EventKind, LogRecord};

/// Convert one record to an event without pairing context.
///
/// A `tool_end` produced this way has no `input`; use [`extract_events`] when
/// a whole ordered stream is available.
pub fn record_to_event(record: &LogRecord) -> Option<Event> {
    let kind = classify::classify(record)?;
    let mut event = Event::new(kind);
    match kind {
        EventKind::ToolStart => {
            event.tool = record.tool().to_string();
            event.input = record.input();
        }
        EventKind::ToolEnd => {
            event.tool = record.tool().to_string();
            event.output = record.output_text();
            event.duration_ms = record.duration_ms();
        }
        EventKind::LlmResponse => {
            event.output = classify::response_text(record).unwrap_or_default();
        }
    }
    event.ts = record.ts().to_string();
    event.session_id = record.session_id().to_string();
    event.raw = record.clone().into_value();
    Some(event)
}

/// Extract the semantic event sequence from an ordered record stream, pairing
/// tool starts with their ends.
///
/// The start-side event is emitted immediately; it is never held back waiting
/// for the end. The pending call is keyed by tool name alone, so only one
/// in-flight call per tool name is representable in this log format. An end
/// with no matching start degrades to an event with empty `input`; unmatched
/// pendings at stream end are dropped, since a dangling call is the normal
/// shape of a truncated or still-running session.
pub fn extract_events(records: &[LogRecord], session_prefix: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut pending: HashMap<String, LogRecord> = HashMap::new();

    for record in records {
        let session_id = record.session_id();
        if !session_prefix.is_empty() && !session_id.starts_with(session_prefix) {
            continue;
        }

        match classify::classify(record) {
            Some(EventKind::ToolStart) => {
                if let Some(event) = record_to_event(record) {
                    events.push(event);
                }
                pending.insert(record.tool().to_string(), record.clone());
            }
            Some(EventKind::ToolEnd) => {
                let start = pending.remove(record.tool());
                if let Some(mut event) = record_to_event(record) {
                    if let Some(start) = start {
                        event.input = start.input();
                    }
                    events.push(event);
                }
            }
            Some(EventKind::LlmResponse) => {
                if let Some(event) = record_to_event(record) {
                    events.push(event);
                }
            }
            None => {}
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: serde_json::Value) -> LogRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_start_end_pairing_copies_input() {
        let records = vec![
            record(json!({
                "msg": "tool_start", "tool": "exec", "session_id": "abc",
                "input": {"command": "ls"}
            })),
            record(json!({
                "msg": "tool_end", "tool": "exec", "session_id": "abc",
                "output": "file.txt", "duration": 12
            })),
        ];

        let events = extract_events(&records, "");
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].kind, EventKind::ToolStart);
        assert_eq!(events[0].tool, "exec");
        assert_eq!(events[0].input.get("command"), Some(&json!("ls")));

        assert_eq!(events[1].kind, EventKind::ToolEnd);
        assert_eq!(events[1].tool, "exec");
        assert_eq!(events[1].output, "file.txt");
        assert_eq!(events[1].duration_ms, Some(12));
        assert_eq!(events[1].input.get("command"), Some(&json!("ls")));
    }

    #[test]
    fn test_unmatched_end_degrades_to_empty_input() {
        let records = vec![record(json!({
            "msg": "tool_end", "tool": "exec", "session_id": "abc", "output": "x"
        }))];

        let events = extract_events(&records, "");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::ToolEnd);
        assert!(events[0].input.is_empty());
    }

    #[test]
    fn test_every_end_record_emits_an_event() {
        // Monotonic pairing: tool_end events equal tool_end records regardless
        // of pairing success.
        let records = vec![
            record(json!({"msg": "tool_end", "tool": "a", "session_id": "s"})),
            record(json!({"msg": "tool_start", "tool": "b", "session_id": "s"})),
            record(json!({"msg": "tool_end", "tool": "b", "session_id": "s"})),
            record(json!({"msg": "tool_end", "tool": "b", "session_id": "s"})),
        ];

        let events = extract_events(&records, "");
        let ends = events
            .iter()
            .filter(|e| e.kind == EventKind::ToolEnd)
            .count();
        assert_eq!(ends, 3);
    }

    #[test]
    fn test_dangling_start_is_dropped_silently() {
        let records = vec![record(json!({
            "msg": "tool_start", "tool": "exec", "session_id": "abc"
        }))];

        let events = extract_events(&records, "");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::ToolStart);
    }

    #[test]
    fn test_session_prefix_filter() {
        let records = vec![
            record(json!({"msg": "tool_start", "tool": "a", "session_id": "abc"})),
            record(json!({"msg": "tool_start", "tool": "b", "session_id": "xyz"})),
        ];

        let events = extract_events(&records, "ab");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].session_id, "abc");
    }

    #[test]
    fn test_tool_start_with_content_key_stays_tool_start() {
        // Classification priority is decided once, in classify(); a start
        // record that also carries a response key never becomes llm_response.
        let rec = record(json!({
            "msg": "tool_start", "tool": "exec", "session_id": "abc",
            "content": "noise", "input": {"command": "ls"}
        }));

        let event = record_to_event(&rec).unwrap();
        assert_eq!(event.kind, EventKind::ToolStart);
        assert_eq!(event.input.get("command"), Some(&json!("ls")));
    }

    #[test]
    fn test_llm_response_from_alternate_keys() {
        let records = vec![record(json!({
            "answer": "forty-two", "session_id": "abc", "ts": "2025-01-15T10:00:00Z"
        }))];

        let events = extract_events(&records, "");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::LlmResponse);
        assert_eq!(events[0].output, "forty-two");
    }
}
