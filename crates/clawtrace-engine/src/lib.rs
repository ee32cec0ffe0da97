pub mod pairing;
pub mod summary;
pub mod transcript;
pub mod turn;

pub use pairing::{extract_events, record_to_event};
pub use summary::sessions_from_logs;
pub use transcript::{build_events, TraceBuilder};
pub use turn::{CompletedTurn, InvocationBuffer};
