//! Directory resolution for the OpenClaw runtime's on-disk layout.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Where the runtime writes its dated process logs.
pub const DEFAULT_LOG_DIR: &str = "/tmp/openclaw";

pub fn log_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(DEFAULT_LOG_DIR),
    }
}

/// The agent workspace directory.
///
/// Resolution order: explicit override, then `agents.defaults.workspace` from
/// `~/.openclaw/openclaw.json`, then `~/.openclaw/workspace`. An unreadable or
/// malformed config file falls through to the fallback.
pub fn workspace(override_dir: &str) -> PathBuf {
    if !override_dir.is_empty() {
        return PathBuf::from(override_dir);
    }

    let home = home_dir();
    let config_file = home.join(".openclaw").join("openclaw.json");
    if let Ok(text) = std::fs::read_to_string(&config_file) {
        if let Ok(config) = serde_json::from_str::<Value>(&text) {
            if let Some(ws) = config
                .pointer("/agents/defaults/workspace")
                .and_then(Value::as_str)
            {
                if !ws.is_empty() {
                    return PathBuf::from(ws);
                }
            }
        }
    }

    home.join(".openclaw").join("workspace")
}

/// Per-agent transcript directory: `~/.openclaw/agents/<agent>/sessions`.
pub fn sessions_dir(agent: &str) -> PathBuf {
    home_dir()
        .join(".openclaw")
        .join("agents")
        .join(agent)
        .join("sessions")
}

/// Root for this tool's own persisted state and artifacts.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => home_dir().join(".clawtrace"),
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
