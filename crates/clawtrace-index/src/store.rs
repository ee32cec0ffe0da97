use std::fs;
use std::path::{Path, PathBuf};

use crate::offset::{self, SessionIndex};
use crate::Result;

/// Where persisted index tables live.
///
/// Constructed explicitly by the caller and passed to whatever needs it; there
/// is no process-global index directory and no hidden lazy creation inside
/// library code. The tables themselves are disposable caches: deleting the
/// directory only costs re-scan time.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Use `dir` as the index directory without touching the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the index directory and return a store rooted at it.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic index path for a log file: `<dir>/<log_file_name>.idx`.
    pub fn index_path(&self, log_path: &Path) -> PathBuf {
        let name = log_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{}.idx", name))
    }

    /// Load (or build/refresh) the index for one log file.
    pub fn load(&self, log_path: &Path) -> Result<SessionIndex> {
        offset::load(log_path, &self.index_path(log_path))
    }

    /// Force a full rebuild of one log file's index.
    pub fn rebuild(&self, log_path: &Path) -> Result<SessionIndex> {
        offset::build(log_path, &self.index_path(log_path))
    }
}
