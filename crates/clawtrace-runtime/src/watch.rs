//! Watch service: follower wired to the parse/classify/pair pipeline.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use clawtrace_engine::record_to_event;
use clawtrace_providers::{parse_line, prefilter};
use clawtrace_types::{Event, EventKind};

use crate::follow::LogFollower;
use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    /// Only deliver events whose session id starts with this prefix; empty
    /// means all sessions.
    pub session_prefix: String,
    /// Replay the file from its beginning instead of attaching at the end.
    pub from_start: bool,
}

/// Tail the dated log under `log_dir` and hand each classified event to
/// `on_event`, persisting session state and artifacts along the way.
///
/// On `tool_start` the invocation is appended to the session's
/// `tool_history`; on `tool_end` the output is saved as an artifact; on
/// `llm_response` the session's `last_response` is updated. Runs until the
/// stop flag is set.
pub fn watch_log(
    log_dir: &Path,
    options: &WatchOptions,
    store: &Store,
    stop: Arc<AtomicBool>,
    mut on_event: impl FnMut(&Event),
) -> Result<()> {
    let follower = LogFollower::attach(log_dir, !options.from_start, stop);

    for line in follower {
        // Cheap reject before full decode; the classifier has the final say.
        if !prefilter::is_candidate(&line) {
            continue;
        }
        let Some(record) = parse_line(&line) else {
            continue;
        };

        let session_id = record.session_id().to_string();
        if !options.session_prefix.is_empty() && !session_id.starts_with(&options.session_prefix) {
            continue;
        }

        let Some(event) = record_to_event(&record) else {
            continue;
        };

        match event.kind {
            EventKind::ToolStart => store.append_tool_history(&event)?,
            EventKind::ToolEnd => {
                store.artifact_save(&session_id, &event.tool, &event.output)?;
            }
            EventKind::LlmResponse => store.set_last_response(&session_id, &event.output)?,
        }

        on_event(&event);
    }

    Ok(())
}
