//! Skillswap CLI: the `skillswap` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing();

    match cli.command {
        Commands::Replay {
            users,
            events,
            config,
            lenient,
            json,
        } => commands::replay::run(users, events, config, lenient, json),

        Commands::View {
            viewer_id,
            users,
            events,
            config,
            status,
            json,
        } => commands::view::run(viewer_id, users, events, config, status, json),
    }
}
