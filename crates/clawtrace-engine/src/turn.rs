use clawtrace_types::Event;

/// Rendering state for one open turn during live follow.
///
/// Created when a user-role message opens the turn; accumulates the realized
/// events and the plan text seen so far, plus at most one in-flight tool call.
/// Closing the turn consumes the buffer.
#[derive(Debug, Clone)]
pub struct InvocationBuffer {
    pub user_text: String,
    pub start_ts: String,
    events: Vec<Event>,
    plan: Vec<String>,
    in_flight: Option<String>,
}

/// A finished turn: user message through the assistant's final reply.
#[derive(Debug, Clone)]
pub struct CompletedTurn {
    pub user_text: String,
    pub start_ts: String,
    pub end_ts: String,
    pub final_reply: String,
    pub events: Vec<Event>,
}

impl InvocationBuffer {
    pub fn new(user_text: impl Into<String>, start_ts: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            start_ts: start_ts.into(),
            events: Vec::new(),
            plan: Vec::new(),
            in_flight: None,
        }
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Record a free-text segment preceding (or interleaved with) a tool call.
    pub fn push_plan_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.plan.push(text.to_string());
        }
    }

    /// Plan text accumulated so far, newline-joined. Empty when the turn had
    /// only tool-call content, never absent.
    pub fn plan_text(&self) -> String {
        self.plan.join("\n")
    }

    /// Mark a call key as in flight. At most one is held; a new call replaces
    /// the previous one.
    pub fn set_in_flight(&mut self, key: impl Into<String>) {
        self.in_flight = Some(key.into());
    }

    pub fn clear_in_flight(&mut self) {
        self.in_flight = None;
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Close the turn with the assistant's final text reply.
    pub fn close(self, final_reply: impl Into<String>, end_ts: impl Into<String>) -> CompletedTurn {
        CompletedTurn {
            user_text: self.user_text,
            start_ts: self.start_ts,
            end_ts: end_ts.into(),
            final_reply: final_reply.into(),
            events: self.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawtrace_types::{Event, EventKind};

    #[test]
    fn test_buffer_lifecycle() {
        let mut buffer = InvocationBuffer::new("list the files", "2025-01-15T10:00:00Z");
        buffer.push_plan_text("I'll run ls first.");
        buffer.set_in_flight("call-1");
        buffer.push_event(Event::new(EventKind::ToolEnd));
        buffer.clear_in_flight();

        assert_eq!(buffer.plan_text(), "I'll run ls first.");
        assert!(buffer.in_flight().is_none());

        let turn = buffer.close("Here are the files.", "2025-01-15T10:00:05Z");
        assert_eq!(turn.user_text, "list the files");
        assert_eq!(turn.final_reply, "Here are the files.");
        assert_eq!(turn.events.len(), 1);
    }

    #[test]
    fn test_plan_text_empty_without_text_segments() {
        let buffer = InvocationBuffer::new("go", "");
        assert_eq!(buffer.plan_text(), "");
    }

    #[test]
    fn test_at_most_one_in_flight_call() {
        let mut buffer = InvocationBuffer::new("go", "");
        buffer.set_in_flight("call-1");
        buffer.set_in_flight("call-2");
        assert_eq!(buffer.in_flight(), Some("call-2"));
    }
}
