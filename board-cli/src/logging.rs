//! Tracing setup for the CLI. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` means debug for the board
/// crates and the configured level applies everywhere else.
pub fn init(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("board=debug,swissarmyhammer_board=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}
