pub mod error;
pub mod offset;
pub mod reader;
pub mod store;
pub mod window;

pub use error::{Error, Result};
pub use reader::{log_files, read_all_logs, read_logs_for_session, LOG_FILE_PREFIX, LOG_FILE_SUFFIX};
pub use store::IndexStore;
pub use window::iter_session_lines;
