use clawtrace_types::LogRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ANSI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

static SESSION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sessionId=([a-f0-9-]+)").unwrap());
static RUN_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"runId=([a-f0-9-]+)").unwrap());
static TOOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"tool=(\w+)").unwrap());

/// Literal phrase markers recognized inside an enveloped message text.
/// Order matters: the more specific tool markers come before the run markers.
const MESSAGE_MARKERS: &[&str] = &[
    "embedded run tool start",
    "embedded run tool end",
    "embedded run start",
    "embedded run done",
    "response sent",
];

/// Parse one raw log line into a canonical [`LogRecord`].
///
/// Two encodings are accepted:
/// 1. Flat JSON objects (`{"msg": "...", "tool": "...", "session_id": "..."}`),
///    returned unchanged with no further text scanning.
/// 2. Metadata-enveloped lines (`{"_meta": {...}, "1": "embedded run tool
///    start: sessionId=... tool=..."}`) whose free-text message field is mined
///    for identity, tool name, a coarse `msg` classification, and a timestamp.
///
/// Lines that do not decode to a JSON object, and wrapped lines that yield no
/// session id, return `None`. Partial writes land here as decode failures and
/// are dropped silently; they are steady state, not a fault.
pub fn parse_line(line: &str) -> Option<LogRecord> {
    let line = ANSI_RE.replace_all(line.trim(), "");
    if line.is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(&line).ok()?;
    let Value::Object(entry) = value else {
        return None;
    };

    // Flat encoding: already canonical.
    if !entry.contains_key("_meta") {
        return Some(LogRecord::from_map(entry));
    }

    // Enveloped encoding: everything useful lives in the "1" text field.
    let msg_text = entry.get("1").and_then(Value::as_str).unwrap_or("");
    if msg_text.is_empty() {
        return None;
    }

    let mut parsed = LogRecord::new();

    if let Some(cap) = SESSION_ID_RE.captures(msg_text) {
        parsed.insert("session_id", Value::String(cap[1].to_string()));
    } else if let Some(cap) = RUN_ID_RE.captures(msg_text) {
        // runId is fallback identity only; it never overwrites a session id.
        parsed.insert("session_id", Value::String(cap[1].to_string()));
    }

    if let Some(cap) = TOOL_RE.captures(msg_text) {
        parsed.insert("tool", Value::String(cap[1].to_string()));
    }

    if let Some(marker) = MESSAGE_MARKERS.iter().find(|m| msg_text.contains(*m)) {
        parsed.insert("msg", Value::String(marker.to_string()));
    }

    if let Some(time) = entry.get("time") {
        parsed.insert("ts", time.clone());
    } else if let Some(date) = entry.get("_meta").and_then(|m| m.get("date")) {
        parsed.insert("ts", date.clone());
    }

    // Wrapped records without identity are noise.
    if parsed.session_id().is_empty() {
        return None;
    }

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_shape_returned_unchanged() {
        let line = r#"{"msg":"tool_start","tool":"exec","session_id":"abc","input":{"command":"ls"}}"#;
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.session_id(), "abc");
        assert_eq!(rec.tool(), "exec");
        assert_eq!(rec.msg(), "tool_start");
        assert_eq!(rec.input().get("command"), Some(&json!("ls")));
    }

    #[test]
    fn test_flat_shape_round_trip_preserves_fields() {
        let original = json!({
            "msg": "tool_end",
            "tool": "read",
            "session_id": "abc",
            "output": "contents"
        });
        let rec = parse_line(&original.to_string()).unwrap();
        assert_eq!(rec.session_id(), "abc");
        assert_eq!(rec.tool(), "read");
        assert_eq!(rec.output_text(), "contents");
    }

    #[test]
    fn test_wrapped_shape_extracts_tokens() {
        let line = r#"{"_meta":{"date":"2025-01-15T10:00:00Z"},"1":"embedded run tool start: sessionId=abc123 tool=exec"}"#;
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.session_id(), "abc123");
        assert_eq!(rec.tool(), "exec");
        assert_eq!(rec.msg(), "embedded run tool start");
        assert_eq!(rec.ts(), "2025-01-15T10:00:00Z");
    }

    #[test]
    fn test_wrapped_shape_prefers_top_level_time() {
        let line = r#"{"_meta":{"date":"2025-01-15"},"time":"2025-01-15T10:00:01Z","1":"response sent sessionId=abc"}"#;
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.ts(), "2025-01-15T10:00:01Z");
        assert_eq!(rec.msg(), "response sent");
    }

    #[test]
    fn test_wrapped_shape_run_id_fallback() {
        let line = r#"{"_meta":{},"1":"embedded run done runId=deadbeef-1234"}"#;
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.session_id(), "deadbeef-1234");
    }

    #[test]
    fn test_wrapped_shape_session_id_wins_over_run_id() {
        let line = r#"{"_meta":{},"1":"embedded run start sessionId=aaa111 runId=bbb222"}"#;
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.session_id(), "aaa111");
    }

    #[test]
    fn test_wrapped_shape_without_identity_is_dropped() {
        let line = r#"{"_meta":{},"1":"embedded run tool start tool=exec"}"#;
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_wrapped_shape_without_message_text_is_dropped() {
        let line = r#"{"_meta":{"date":"2025-01-15"}}"#;
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_ansi_codes_stripped() {
        let line = "\x1b[32m{\"session_id\":\"abc\",\"msg\":\"tool_start\"}\x1b[0m";
        let rec = parse_line(line).unwrap();
        assert_eq!(rec.session_id(), "abc");
    }

    #[test]
    fn test_blank_and_malformed_lines_dropped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("\x1b[32m\x1b[0m").is_none());
        assert!(parse_line("not json").is_none());
        assert!(parse_line(r#"{"truncated": "#).is_none());
        assert!(parse_line(r#"[1, 2, 3]"#).is_none());
        assert!(parse_line(r#""just a string""#).is_none());
    }
}
