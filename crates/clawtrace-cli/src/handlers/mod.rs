pub mod index;
pub mod meta;
pub mod sessions;
pub mod trace;
pub mod watch;
