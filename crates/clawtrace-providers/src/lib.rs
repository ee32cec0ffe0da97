pub mod classify;
pub mod error;
pub mod line;
pub mod prefilter;
pub mod transcript;

pub use classify::{RESPONSE_KEYS, TOOL_END_MSGS, TOOL_START_MSGS, TURN_END_MSGS};
pub use error::{Error, Result};
pub use line::parse_line;
