use std::collections::HashMap;
use std::path::Path;

use clawtrace_index::{iter_session_lines, log_files, IndexStore};
use clawtrace_providers::{classify, parse_line};
use clawtrace_types::SessionSummary;

/// Aggregate every indexed session in `log_dir` into per-session summaries.
///
/// Each log file's index is loaded (building or refreshing it as needed) and
/// every entry's window is walked once. A session spanning multiple rotated
/// files accumulates across them. Timestamps are compared lexically, which is
/// ordering-correct for the RFC 3339 strings the logs carry; empty timestamps
/// never win a min/max. Results are sorted by `last_ts` descending, so the
/// most recently active session comes first.
pub fn sessions_from_logs(log_dir: &Path, store: &IndexStore) -> Vec<SessionSummary> {
    let mut sessions: HashMap<String, SessionSummary> = HashMap::new();

    for log_file in log_files(log_dir) {
        let index = match store.load(&log_file) {
            Ok(index) => index,
            Err(err) => {
                eprintln!("skipping unreadable log file {}: {}", log_file.display(), err);
                continue;
            }
        };

        for entry in index.values() {
            let lines = match iter_session_lines(&log_file, entry.byte_offset, &entry.session_id) {
                Ok(lines) => lines,
                Err(err) => {
                    eprintln!(
                        "skipping session {} in {}: {}",
                        entry.session_id,
                        log_file.display(),
                        err
                    );
                    continue;
                }
            };

            let summary = sessions
                .entry(entry.session_id.clone())
                .or_insert_with(|| SessionSummary {
                    session_id: entry.session_id.clone(),
                    ..SessionSummary::default()
                });

            for line in lines {
                let Some(record) = parse_line(&line) else {
                    continue;
                };

                let ts = record.ts();
                if !ts.is_empty() {
                    if summary.first_ts.is_empty() || ts < summary.first_ts.as_str() {
                        summary.first_ts = ts.to_string();
                    }
                    if ts > summary.last_ts.as_str() {
                        summary.last_ts = ts.to_string();
                    }
                }

                if classify::is_tool_end(&record) {
                    summary.tool_count += 1;
                }
                if classify::is_turn_end(&record) {
                    summary.turns += 1;
                }
                if summary.agent.is_empty() {
                    let agent = record.agent();
                    if !agent.is_empty() {
                        summary.agent = agent.to_string();
                    }
                }
            }
        }
    }

    let mut summaries: Vec<SessionSummary> = sessions.into_values().collect();
    summaries.sort_by(|a, b| b.last_ts.cmp(&a.last_ts));
    summaries
}
