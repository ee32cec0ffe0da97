use anyhow::Result;
use clawtrace_providers::transcript::{extract_session_metadata, session_file_path};
use clawtrace_runtime::config;

pub fn handle(agent: &str, session: &str) -> Result<()> {
    let path = session_file_path(&config::sessions_dir(agent), session);
    let metadata = extract_session_metadata(&path)?;

    if metadata == Default::default() {
        println!("No metadata for session '{}'", session);
        return Ok(());
    }

    if !metadata.model.is_empty() {
        println!("model:          {}", metadata.model);
    }
    if !metadata.provider.is_empty() {
        println!("provider:       {}", metadata.provider);
    }
    if !metadata.thinking_level.is_empty() {
        println!("thinking level: {}", metadata.thinking_level);
    }
    if !metadata.cwd.is_empty() {
        println!("cwd:            {}", metadata.cwd);
    }
    if let Some(version) = metadata.session_version {
        println!("version:        {}", version);
    }

    Ok(())
}
