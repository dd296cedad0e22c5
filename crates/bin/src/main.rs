use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warden=info".parse()?))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::ServeAuthority(args) => commands::serve_authority::run(args).await,
        Commands::ServeDestinations(args) => commands::serve_destinations::run(args).await,
        Commands::Health(args) => commands::health::run(args).await,
    }
}
