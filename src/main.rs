//! CodeLens CLI entry point

use clap::Parser;
use codelens::cli::{Cli, Commands};
use codelens::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("CODELENS_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest(args) => codelens::cli::ingest::run(args).await,
        Commands::Ask(args) => codelens::cli::ask::run(args).await,
        Commands::Chat(args) => codelens::cli::chat::run(args).await,
        Commands::List => codelens::cli::list::run(),
        Commands::Stats(args) => codelens::cli::stats::run(args),
        Commands::Tree(args) => codelens::cli::tree::run(args),
        Commands::Delete(args) => codelens::cli::delete::run(args),
    }
}
