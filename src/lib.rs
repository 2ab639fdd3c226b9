pub mod cli;
pub mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::error::LauncherResult;

/// Parse the command line, set up logging and run the chosen command.
pub async fn run() -> LauncherResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::info!("Laccom launcher {} starting...", env!("CARGO_PKG_VERSION"));
    cli.execute().await
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "debug"
    } else {
        "info,laccom_launcher=info"
    };

    // stderr keeps stdout free for the progress bar and printed results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
