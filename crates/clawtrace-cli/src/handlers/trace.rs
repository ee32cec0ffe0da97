use std::path::Path;

use anyhow::Result;
use clawtrace_engine::{build_events, extract_events};
use clawtrace_index::{read_logs_for_session, IndexStore};
use clawtrace_providers::transcript::{read_session_records, session_file_path};
use clawtrace_runtime::config;

use crate::render;

pub fn handle(
    log_dir: &Path,
    store: &IndexStore,
    agent: &str,
    session: &str,
    json: bool,
    transcript: bool,
) -> Result<()> {
    let events = if transcript {
        let path = session_file_path(&config::sessions_dir(agent), session);
        let records = read_session_records(&path)?;
        build_events(session, &records)
    } else {
        let records = read_logs_for_session(log_dir, store, session);
        extract_events(&records, session)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events for session '{}'", session);
        return Ok(());
    }

    let color = render::use_color();
    for event in &events {
        render::print_event(event, color);
    }

    Ok(())
}
