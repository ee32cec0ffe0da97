//! Plain-text event rendering for the console.

use clawtrace_types::{Event, EventKind};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// Whether stdout should be colored.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Collapse whitespace and cap at `max_chars`, respecting char boundaries.
pub fn truncate_for_display(s: &str, max_chars: usize) -> String {
    let normalized = s
        .replace(['\n', '\r'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if normalized.chars().count() <= max_chars {
        normalized
    } else {
        let truncated: String = normalized.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn short_id(session_id: &str) -> String {
    session_id.chars().take(8).collect()
}

pub fn print_event(event: &Event, color: bool) {
    let id = short_id(&event.session_id);

    match event.kind {
        EventKind::ToolStart => {
            let head = format!("▶ {}  [{}]  {}", event.tool, id, event.ts);
            if color {
                println!("{}", head.cyan());
            } else {
                println!("{}", head);
            }
            if !event.input.is_empty() {
                let input = serde_json::to_string(&event.input).unwrap_or_default();
                println!("  in: {}", truncate_for_display(&input, 100));
            }
        }
        EventKind::ToolEnd => {
            let duration = event
                .duration_ms
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_default();
            let head = format!("✓ {}  {}  [{}]", event.tool, duration, id);
            if color {
                println!("{}", head.green());
            } else {
                println!("{}", head);
            }
            if !event.output.is_empty() {
                println!("  out: {}", truncate_for_display(&event.output, 100));
            }
            if !event.status.is_empty() && event.status != "completed" {
                println!("  status: {}", event.status);
            }
        }
        EventKind::LlmResponse => {
            let head = format!("◎ llm  [{}]", id);
            if color {
                println!("{}", head.magenta());
            } else {
                println!("{}", head);
            }
            if !event.output.is_empty() {
                println!("  {}", truncate_for_display(&event.output, 200));
            }
        }
    }
}
