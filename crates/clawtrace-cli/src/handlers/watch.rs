use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clawtrace_runtime::{dated_log_path, watch_log, Store, WatchOptions};

use crate::render;

pub fn handle(
    log_dir: &Path,
    data_dir: &Path,
    session: Option<String>,
    from_start: bool,
) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || {
        handler_stop.store(true, Ordering::Relaxed);
    })?;

    let today = chrono::Local::now().date_naive();
    println!("Watching {}", dated_log_path(log_dir, today).display());
    if let Some(prefix) = &session {
        println!("Filtering session prefix '{}'", prefix);
    }

    let options = WatchOptions {
        session_prefix: session.unwrap_or_default(),
        from_start,
    };
    let store = Store::new(data_dir);
    let color = render::use_color();

    watch_log(log_dir, &options, &store, stop, |event| {
        render::print_event(event, color);
    })?;

    println!("Watch stopped");
    Ok(())
}
