use std::collections::HashMap;

use chrono::DateTime;
use clawtrace_providers::transcript::{MessageRecord, Role, Segment, TranscriptRecord};
use clawtrace_types::{Event, EventKind};
use serde_json::{Map, Value};

use crate::turn::{CompletedTurn, InvocationBuffer};

/// Captured start-side state of an in-flight tool call.
///
/// Owned by the builder for the duration of one session's processing and
/// discarded once matched or once the record stream ends. A dangling call is
/// the normal outcome of a truncated or still-running session, not an error.
struct PendingCall {
    tool: String,
    arguments: Map<String, Value>,
    timestamp: String,
    plan_text: String,
    model: String,
    usage: Map<String, Value>,
}

/// Incremental transcript-to-event builder.
///
/// Feed records in file order with [`TraceBuilder::push`]; each call returns
/// the events realized by that record. Pending calls are keyed by the
/// transcript's explicit call id, falling back to `"{tool}-{message_id}"`
/// when the format omitted one. A `toolResult` with status "running" emits an
/// intermediate end-shaped event without retiring the pending call; a later
/// terminal status retires it and may compute `duration_ms` from elapsed wall
/// time when the record's own duration is zero or missing.
pub struct TraceBuilder {
    session_id: String,
    pending: HashMap<String, PendingCall>,
    turn: Option<InvocationBuffer>,
    completed: Option<CompletedTurn>,
}

impl TraceBuilder {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            pending: HashMap::new(),
            turn: None,
            completed: None,
        }
    }

    /// The turn closed by the most recent `push`, if any.
    pub fn take_completed_turn(&mut self) -> Option<CompletedTurn> {
        self.completed.take()
    }

    pub fn push(&mut self, record: &TranscriptRecord) -> Vec<Event> {
        let TranscriptRecord::Message(msg) = record else {
            return Vec::new();
        };

        match msg.message.role {
            Role::User => {
                self.open_turn(msg);
                Vec::new()
            }
            Role::Assistant => self.push_assistant(msg),
            Role::ToolResult => self.push_tool_result(msg),
            Role::Unknown => Vec::new(),
        }
    }

    fn open_turn(&mut self, msg: &MessageRecord) {
        let user_text = first_text(&msg.message.content).unwrap_or_default();
        // An unclosed previous turn is simply replaced; the session was
        // interrupted before its reply.
        self.turn = Some(InvocationBuffer::new(user_text, msg.timestamp.clone()));
    }

    fn push_assistant(&mut self, msg: &MessageRecord) -> Vec<Event> {
        let has_tool_call = msg
            .message
            .content
            .iter()
            .any(|s| matches!(s, Segment::ToolCall { .. }));

        // A truncated transcript can open with assistant content; buffer it
        // against an anonymous turn so plan text is still captured.
        let turn = self
            .turn
            .get_or_insert_with(|| InvocationBuffer::new("", msg.timestamp.clone()));

        // All of the message's text joins the plan before any call snapshots
        // it; segment order within one message does not split the text.
        for segment in &msg.message.content {
            if let Segment::Text { text } = segment {
                turn.push_plan_text(text);
            }
        }

        for segment in &msg.message.content {
            let Segment::ToolCall {
                id,
                name,
                arguments,
            } = segment
            else {
                continue;
            };
            let key = call_key(id, name, &msg.id);
            self.pending.insert(
                key.clone(),
                PendingCall {
                    tool: name.clone(),
                    arguments: arguments.clone(),
                    timestamp: msg.timestamp.clone(),
                    plan_text: turn.plan_text(),
                    model: msg.message.model.clone(),
                    usage: msg.message.usage.clone(),
                },
            );
            turn.set_in_flight(key);
        }

        if has_tool_call {
            return Vec::new();
        }

        let Some(text) = first_text(&msg.message.content) else {
            return Vec::new();
        };

        // A plain text reply closes the turn.
        let mut event = Event::new(EventKind::LlmResponse);
        event.output = text.clone();
        event.ts = msg.timestamp.clone();
        event.session_id = self.session_id.clone();
        event.plan_text = text.clone();
        event.model = msg.message.model.clone();
        event.usage = msg.message.usage.clone();
        event.raw = serde_json::to_value(msg).unwrap_or(Value::Null);

        if let Some(turn) = self.turn.take() {
            self.completed = Some(turn.close(text, msg.timestamp.clone()));
        }

        vec![event]
    }

    fn push_tool_result(&mut self, msg: &MessageRecord) -> Vec<Event> {
        let body = &msg.message;
        let key = call_key(&body.tool_call_id, &body.tool_name, &msg.id);
        let running = body.details.status == "running";

        let mut event = Event::new(EventKind::ToolEnd);
        event.tool = body.tool_name.clone();
        event.output = first_text(&body.content).unwrap_or_default();
        event.status = body.details.status.clone();
        event.exit_code = body.details.exit_code;
        event.ts = msg.timestamp.clone();
        event.session_id = self.session_id.clone();
        event.duration_ms = body.details.duration_ms;
        event.raw = serde_json::to_value(msg).unwrap_or(Value::Null);

        if running {
            // Intermediate progress: attach start-side state but keep the
            // pending call alive for the terminal record.
            if let Some(call) = self.pending.get(&key) {
                attach_call(&mut event, call);
            }
        } else {
            let call = self.pending.remove(&key);
            if let Some(call) = &call {
                attach_call(&mut event, call);
                if event.ts.is_empty() {
                    event.ts = call.timestamp.clone();
                }
                if event.duration_ms.unwrap_or(0) == 0 {
                    if let Some(elapsed) = elapsed_ms(&call.timestamp, &msg.timestamp) {
                        event.duration_ms = Some(elapsed);
                    }
                }
            }
            if let Some(turn) = self.turn.as_mut() {
                turn.clear_in_flight();
            }
        }

        if let Some(turn) = self.turn.as_mut() {
            turn.push_event(event.clone());
        }

        vec![event]
    }
}

/// Build the full event sequence for one session's transcript.
pub fn build_events(session_id: &str, records: &[TranscriptRecord]) -> Vec<Event> {
    let mut builder = TraceBuilder::new(session_id);
    let mut events = Vec::new();
    for record in records {
        events.extend(builder.push(record));
    }
    events
}

fn call_key(call_id: &str, tool: &str, message_id: &str) -> String {
    if call_id.is_empty() {
        format!("{}-{}", tool, message_id)
    } else {
        call_id.to_string()
    }
}

fn first_text(content: &[Segment]) -> Option<String> {
    content.iter().find_map(|segment| match segment {
        Segment::Text { text } if !text.is_empty() => Some(text.clone()),
        _ => None,
    })
}

fn attach_call(event: &mut Event, call: &PendingCall) {
    event.input = call.arguments.clone();
    event.plan_text = call.plan_text.clone();
    event.model = call.model.clone();
    event.usage = call.usage.clone();
    if event.tool.is_empty() {
        event.tool = call.tool.clone();
    }
}

/// Wall-time milliseconds between two RFC 3339 timestamps, if both parse and
/// the interval is non-negative.
fn elapsed_ms(start_ts: &str, end_ts: &str) -> Option<i64> {
    let start = DateTime::parse_from_rfc3339(start_ts).ok()?;
    let end = DateTime::parse_from_rfc3339(end_ts).ok()?;
    let ms = (end - start).num_milliseconds();
    (ms >= 0).then_some(ms)
}
