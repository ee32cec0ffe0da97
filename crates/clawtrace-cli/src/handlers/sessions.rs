use std::path::Path;

use anyhow::Result;
use clawtrace_engine::sessions_from_logs;
use clawtrace_index::IndexStore;
use owo_colors::OwoColorize;

use crate::render;

pub fn handle(log_dir: &Path, store: &IndexStore, limit: usize, json: bool) -> Result<()> {
    let mut sessions = sessions_from_logs(log_dir, store);
    sessions.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found in {}", log_dir.display());
        return Ok(());
    }

    let color = render::use_color();
    for session in &sessions {
        let id: String = session.session_id.chars().take(8).collect();
        let line = format!(
            "{:<8}  {:<20}  tools:{:<4} turns:{:<3} {}",
            id, session.last_ts, session.tool_count, session.turns, session.agent
        );
        if color {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
