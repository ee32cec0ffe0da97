use std::path::Path;

use anyhow::{Context, Result};
use clawtrace_index::IndexStore;

pub fn handle(store: &IndexStore, log_file: &Path) -> Result<()> {
    let index = store
        .load(log_file)
        .with_context(|| format!("indexing {}", log_file.display()))?;

    println!(
        "{}: {} sessions -> {}",
        log_file.display(),
        index.len(),
        store.index_path(log_file).display()
    );
    Ok(())
}
