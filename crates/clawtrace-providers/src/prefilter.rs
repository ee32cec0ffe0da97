use once_cell::sync::Lazy;
use regex::Regex;

// Alternation over every phrase and key that can make classify() fire, in
// either encoding. False positives are fine; a miss would lose an event, so
// the pattern is deliberately loose.
static CANDIDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "embedded run tool (?:start|end)",
        "|\"msg\"\\s*:\\s*\"(?:tool_start|tool_end|run tool start|run tool end)\"",
        "|\"event\"\\s*:\\s*\"agent\\.run\\.tool_(?:start|end)\"",
        "|run finished|agent done|run complete|turn end|response sent",
        "|\"(?:response|answer|content)\"",
    ))
    .unwrap()
});

/// Cheap raw-line screen that nominates candidates for [`crate::classify`].
///
/// This never makes a final accept/reject decision: a `true` only means the
/// line is worth decoding and handing to the real classifier. Callers on hot
/// paths that care solely about classified events may skip lines that return
/// `false`; callers that need identity or timestamps must still parse every
/// line.
pub fn is_candidate(line: &str) -> bool {
    CANDIDATE_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify, parse_line};
    use serde_json::json;

    #[test]
    fn test_approves_flat_tool_lines() {
        assert!(is_candidate(r#"{"msg":"tool_start","tool":"exec","session_id":"s"}"#));
        assert!(is_candidate(r#"{"event":"agent.run.tool_end","session_id":"s"}"#));
    }

    #[test]
    fn test_approves_wrapped_tool_lines() {
        assert!(is_candidate(
            r#"{"_meta":{},"1":"embedded run tool start: sessionId=abc tool=exec"}"#
        ));
    }

    #[test]
    fn test_approves_response_key_lines() {
        assert!(is_candidate(r#"{"content":"hi","session_id":"s"}"#));
    }

    #[test]
    fn test_rejects_plain_noise() {
        assert!(!is_candidate(r#"{"msg":"heartbeat","session_id":"s"}"#));
        assert!(!is_candidate("plain text line"));
    }

    // The screen must never reject a line the real classifier would accept.
    #[test]
    fn test_no_false_negatives_against_classifier() {
        let lines = [
            json!({"msg": "tool_start", "session_id": "s"}).to_string(),
            json!({"msg": "run tool end", "session_id": "s"}).to_string(),
            json!({"event": "agent.run.tool_start", "session_id": "s"}).to_string(),
            json!({"answer": "42", "session_id": "s"}).to_string(),
            json!({"msg": "run finished", "session_id": "s"}).to_string(),
            r#"{"_meta":{},"1":"embedded run tool end sessionId=abc tool=exec"}"#.to_string(),
        ];

        for line in &lines {
            let record = parse_line(line).unwrap();
            if classify::classify(&record).is_some() || classify::is_turn_end(&record) {
                assert!(is_candidate(line), "prefilter rejected classifiable line: {}", line);
            }
        }
    }
}
