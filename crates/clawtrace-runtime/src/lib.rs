//! Live side of the trace pipeline.
//!
//! Followers tail the growing process log (or a directory of per-session
//! transcripts) with cooperative polling and feed each new line through the
//! parse/classify/pair pipeline. The watch service wires a follower to an
//! event callback and persists per-session state and tool artifacts as events
//! arrive. Everything here is cancellable through a shared stop flag checked
//! once per poll cycle, never mid-read.

pub mod config;
pub mod follow;
pub mod session_follow;
pub mod store;
pub mod watch;

pub use follow::{dated_log_path, LogFollower};
pub use session_follow::SessionDirFollower;
pub use store::Store;
pub use watch::{watch_log, WatchOptions};
