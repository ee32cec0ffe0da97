//! Per-session state and tool-artifact persistence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clawtrace_types::Event;
use serde_json::{json, Map, Value};

/// Data-dir rooted store: `state/<session_id>.json` holds a JSON object per
/// session, `artifacts/<session_id>/` collects tool outputs as numbered text
/// files.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn state_path(&self, session_id: &str) -> PathBuf {
        self.root.join("state").join(format!("{}.json", session_id))
    }

    fn artifacts_dir(&self, session_id: &str) -> PathBuf {
        self.root.join("artifacts").join(session_id)
    }

    /// Load a session's state object; missing or unreadable state is an empty
    /// object, never an error.
    pub fn state_load(&self, session_id: &str) -> Map<String, Value> {
        let path = self.state_path(session_id);
        fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    /// Persist a session's state object with a write-then-rename so a reader
    /// never sees a half-written file.
    pub fn state_save(&self, session_id: &str, state: &Map<String, Value>) -> Result<()> {
        let path = self.state_path(session_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(state)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Append a tool invocation to the session's `tool_history`.
    pub fn append_tool_history(&self, event: &Event) -> Result<()> {
        let mut state = self.state_load(&event.session_id);
        let history = state
            .entry("tool_history".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = history {
            items.push(json!({
                "tool": event.tool,
                "ts": event.ts,
                "input": event.input,
            }));
        }
        self.state_save(&event.session_id, &state)
    }

    /// Record the most recent model reply in the session's state.
    pub fn set_last_response(&self, session_id: &str, text: &str) -> Result<()> {
        let mut state = self.state_load(session_id);
        state.insert("last_response".to_string(), Value::String(text.to_string()));
        self.state_save(session_id, &state)
    }

    /// Save one tool output as `artifacts/<session_id>/<n>-<tool>.txt`, where
    /// `n` counts the artifacts already saved for the session.
    pub fn artifact_save(&self, session_id: &str, tool: &str, content: &str) -> Result<PathBuf> {
        let dir = self.artifacts_dir(session_id);
        fs::create_dir_all(&dir)?;

        let n = fs::read_dir(&dir)?.filter_map(|e| e.ok()).count();
        let path = dir.join(format!("{}-{}.txt", n, tool));
        fs::write(&path, content)?;
        Ok(path)
    }

    /// All artifact files saved for a session, sorted by name.
    pub fn artifacts(&self, session_id: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.artifacts_dir(session_id)) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        files.sort();
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clawtrace_types::EventKind;

    #[test]
    fn test_missing_state_is_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.state_load("nope").is_empty());
    }

    #[test]
    fn test_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let mut state = Map::new();
        state.insert("phase".to_string(), json!("running"));
        store.state_save("s1", &state).unwrap();

        let back = store.state_load("s1");
        assert_eq!(back.get("phase"), Some(&json!("running")));
    }

    #[test]
    fn test_tool_history_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let mut event = Event::new(EventKind::ToolStart);
        event.session_id = "s1".to_string();
        event.tool = "exec".to_string();
        store.append_tool_history(&event).unwrap();
        store.append_tool_history(&event).unwrap();

        let state = store.state_load("s1");
        let history = state.get("tool_history").and_then(Value::as_array).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].get("tool"), Some(&json!("exec")));
    }

    #[test]
    fn test_artifact_names_are_sequenced() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let first = store.artifact_save("s1", "exec", "one").unwrap();
        let second = store.artifact_save("s1", "read", "two").unwrap();
        assert!(first.ends_with("0-exec.txt"));
        assert!(second.ends_with("1-read.txt"));

        let files = store.artifacts("s1");
        assert_eq!(files.len(), 2);
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "one");
    }
}
