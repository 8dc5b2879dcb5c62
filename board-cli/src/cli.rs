//! CLI definition for the `board` command.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for `board show`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// board - drive the board ordering engine over a snapshot file
#[derive(Parser, Debug)]
#[command(name = "board")]
#[command(version)]
#[command(about = "Reorder columns and cards on a board snapshot")]
pub struct Cli {
    /// Board-fetch JSON snapshot to read (and rewrite after moves)
    #[arg(short, long, global = true, default_value = "board.json")]
    pub snapshot: PathBuf,

    /// Config file to use instead of ./board.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the board with only the cards passing the filter
    Show {
        /// Case-insensitive title substring
        #[arg(long)]
        name: Option<String>,
        /// Label id to filter by (repeatable)
        #[arg(long = "label")]
        labels: Vec<u64>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Move a column to a new index on the board
    MoveColumn {
        /// Drag id (uuid) of the column
        column: String,
        /// Target index
        to_index: usize,
    },
    /// Move a card within a column or to another column
    MoveCard {
        /// Drag id (uuid) of the card
        card: String,
        /// Drag id of the column the card is in
        #[arg(long)]
        from: String,
        /// Drag id of the destination column
        #[arg(long)]
        to: String,
        /// Target index in the destination column
        to_index: usize,
    },
    /// List queued sync requests, newest first
    Outbox {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_move_card() {
        let cli = Cli::parse_from([
            "board", "move-card", "c-1", "--from", "todo", "--to", "done", "3",
        ]);
        match cli.command {
            Commands::MoveCard {
                card,
                from,
                to,
                to_index,
            } => {
                assert_eq!(card, "c-1");
                assert_eq!(from, "todo");
                assert_eq!(to, "done");
                assert_eq!(to_index, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.snapshot, PathBuf::from("board.json"));
    }

    #[test]
    fn test_parse_show_with_labels() {
        let cli = Cli::parse_from([
            "board", "--verbose", "show", "--label", "7", "--label", "9", "--format", "yaml",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Show {
                name,
                labels,
                format,
            } => {
                assert!(name.is_none());
                assert_eq!(labels, vec![7, 9]);
                assert_eq!(format, OutputFormat::Yaml);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
