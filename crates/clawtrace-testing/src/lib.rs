//! Testing infrastructure for clawtrace integration tests.
//!
//! Provides builders for synthetic process logs and session transcripts on
//! temporary directories, plus small filesystem helpers (mtime manipulation)
//! for index staleness scenarios.

pub mod fixtures;
pub mod lines;

pub use fixtures::{shift_mtime, LogDir, TranscriptDir};
