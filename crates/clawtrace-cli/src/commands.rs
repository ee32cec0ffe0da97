use anyhow::Result;
use clawtrace_index::IndexStore;
use clawtrace_runtime::config;

use super::args::{Cli, Commands};
use super::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let log_dir = config::log_dir(cli.log_dir.as_deref());
    let data_dir = config::data_dir(cli.data_dir.as_deref());

    match cli.command {
        Commands::Sessions { limit, json } => {
            let store = IndexStore::create(data_dir.join("index"))?;
            handlers::sessions::handle(&log_dir, &store, limit, json)
        }

        Commands::Trace {
            session,
            json,
            transcript,
        } => {
            let store = IndexStore::create(data_dir.join("index"))?;
            handlers::trace::handle(&log_dir, &store, &cli.agent, &session, json, transcript)
        }

        Commands::Index { log_file } => {
            let store = IndexStore::create(data_dir.join("index"))?;
            handlers::index::handle(&store, &log_file)
        }

        Commands::Watch {
            session,
            from_start,
        } => handlers::watch::handle(&log_dir, &data_dir, session, from_start),

        Commands::Meta { session } => handlers::meta::handle(&cli.agent, &session),
    }
}
