//! Fenceline CLI - Command-line interface for the Fenceline console.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fenceline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Registry(args) => commands::registry::run(args).await,
        Commands::Cloudformation(args) => commands::cloudformation::run(&args),
        Commands::Version => {
            println!("fenceline {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
