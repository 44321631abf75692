//! Skiff CLI - client for the skiff container-runtime daemon.

use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let filter = if cli.debug {
        "skiff=debug,skiff_client=debug"
    } else {
        "skiff=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let result = match cli.command {
        Commands::Config(cmd) => commands::config::execute(cmd).await,
        Commands::Container(cmd) => commands::container::execute(cmd).await,
        Commands::Function(cmd) => commands::function::execute(cmd).await,
        Commands::Health => commands::health::execute().await,
        Commands::Version => commands::version::execute().await,
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "error:".red());
        std::process::exit(1);
    }
}
