use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clawtrace")]
#[command(about = "Reconstruct, index, and follow OpenClaw agent traces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory containing the dated openclaw-*.log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Root for persisted indexes, session state, and artifacts
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Agent whose transcript directory to read
    #[arg(long, default_value = "main", global = true)]
    pub agent: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sessions seen in the process logs, most recent first
    Sessions {
        #[arg(long, default_value = "50")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// Print the reconstructed event sequence for one session
    Trace {
        /// Session id, or an unambiguous prefix of one
        session: String,

        #[arg(long)]
        json: bool,

        /// Rebuild from the per-session transcript instead of the process log
        #[arg(long)]
        transcript: bool,
    },

    /// Build or refresh the byte-offset index for one log file
    Index {
        log_file: PathBuf,
    },

    /// Follow the live log and stream events as they happen
    Watch {
        /// Only show events whose session id starts with this prefix
        #[arg(long)]
        session: Option<String>,

        /// Replay today's file from its beginning before tailing
        #[arg(long)]
        from_start: bool,
    },

    /// Show transcript header metadata for a session
    Meta {
        session: String,
    },
}
