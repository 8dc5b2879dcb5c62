//! board - command-line driver for the board ordering engine.
//!
//! Commands:
//! - `board show`: print the board, optionally filtered by title or label
//! - `board move-column <drag-id> <index>`: reorder a column
//! - `board move-card <drag-id> --from <col> --to <col> <index>`: move a card
//! - `board outbox`: list sync requests queued by earlier moves
//!
//! Moves rewrite the snapshot file in place and append one outbox line per
//! entity that needs a remote update.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use swissarmyhammer_board::BoardConfig;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match BoardConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging::init(cli.verbose, &config.log_level);

    match run(cli, config).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: BoardConfig) -> anyhow::Result<String> {
    match cli.command {
        Commands::Show {
            name,
            labels,
            format,
        } => {
            let state = commands::load_snapshot(&cli.snapshot).await?;
            commands::show(state, &config, name, labels, format)
        }
        Commands::MoveColumn { column, to_index } => {
            commands::move_column(&cli.snapshot, &config, column, to_index).await
        }
        Commands::MoveCard {
            card,
            from,
            to,
            to_index,
        } => commands::move_card(&cli.snapshot, &config, card, from, to, to_index).await,
        Commands::Outbox { limit } => commands::outbox(&config, limit).await,
    }
}
