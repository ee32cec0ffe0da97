pub mod event;
pub mod record;
pub mod session;

pub use event::{Event, EventKind};
pub use record::LogRecord;
pub use session::{SessionIndexEntry, SessionMetadata, SessionSummary};
