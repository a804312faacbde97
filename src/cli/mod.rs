//! CLI command definitions and handlers

pub mod ask;
pub mod chat;
pub mod delete;
pub mod ingest;
pub mod list;
pub mod stats;
pub mod tree;

use clap::{Parser, Subcommand};

const LONG_ABOUT: &str = r#"
CodeLens - ask questions about any codebase.

QUICK START:
    1. codelens ingest https://github.com/owner/repo   Clone and index a repo
    2. codelens ask repo "How does routing work?"      Ask a single question
    3. codelens chat repo                              Interactive session

Everything runs locally against an Ollama server. Pull the models first:
    ollama pull nomic-embed-text
    ollama pull llama3.2

EXAMPLES:
    codelens ingest https://github.com/tiangolo/fastapi
    codelens ask fastapi "Where are routes registered?"
    codelens ask fastapi "Show the middleware stack" --path middleware
    codelens list
    codelens stats fastapi
    codelens tree fastapi --depth 2
"#;

/// Codebase Q&A with retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(name = "codelens")]
#[command(author, version)]
#[command(about = "Codebase Q&A with retrieval-augmented generation")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone and index a GitHub repository
    #[command(visible_alias = "i")]
    Ingest(ingest::IngestArgs),

    /// Ask a single question about an indexed repository
    #[command(visible_alias = "a")]
    Ask(ask::AskArgs),

    /// Interactive chat about an indexed repository
    Chat(chat::ChatArgs),

    /// List indexed repositories
    #[command(visible_alias = "ls")]
    List,

    /// Show index stats for a repository
    Stats(stats::StatsArgs),

    /// Print the directory tree of a cloned repository
    Tree(tree::TreeArgs),

    /// Remove a repository's clone and index
    Delete(delete::DeleteArgs),
}
