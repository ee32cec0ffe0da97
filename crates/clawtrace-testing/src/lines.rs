//! Builders for individual synthetic log lines in both encodings.

use serde_json::{json, Value};

pub fn tool_start(session_id: &str, tool: &str, input: Value, ts: &str) -> String {
    json!({
        "msg": "tool_start",
        "tool": tool,
        "session_id": session_id,
        "input": input,
        "ts": ts,
    })
    .to_string()
}

pub fn tool_end(session_id: &str, tool: &str, output: &str, duration: i64, ts: &str) -> String {
    json!({
        "msg": "tool_end",
        "tool": tool,
        "session_id": session_id,
        "output": output,
        "duration": duration,
        "ts": ts,
    })
    .to_string()
}

pub fn turn_end(session_id: &str, ts: &str) -> String {
    json!({
        "msg": "run finished",
        "session_id": session_id,
        "ts": ts,
    })
    .to_string()
}

pub fn llm_response(session_id: &str, text: &str, ts: &str) -> String {
    json!({
        "response": text,
        "session_id": session_id,
        "ts": ts,
    })
    .to_string()
}

/// A metadata-enveloped line as the gateway writes it.
pub fn wrapped_tool_start(session_id: &str, tool: &str, date: &str) -> String {
    json!({
        "_meta": {"date": date},
        "1": format!("embedded run tool start: sessionId={} tool={}", session_id, tool),
    })
    .to_string()
}

/// A line that parses but belongs to no session.
pub fn anonymous(msg: &str) -> String {
    json!({"msg": msg}).to_string()
}
