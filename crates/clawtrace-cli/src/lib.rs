mod args;
mod commands;
mod handlers;
mod render;

pub use args::{Cli, Commands};
pub use commands::run;
