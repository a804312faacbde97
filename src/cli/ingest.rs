use clap::Parser;

use crate::config::Settings;
use crate::embed::OllamaClient;
use crate::error::{Error, Result};
use crate::ingest::{clone_repo, embed_and_store, extract_repo_name, parse_and_chunk};
use crate::parse::FileWalker;

/// Arguments for the ingest command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    codelens ingest https://github.com/tiangolo/fastapi
    codelens ingest https://github.com/owner/repo --force")]
pub struct IngestArgs {
    /// GitHub URL of the repository to index
    pub url: String,

    /// Re-clone and re-index even if already ingested
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: IngestArgs) -> Result<()> {
    let settings = Settings::load()?;
    Settings::ensure_home()?;

    let client = OllamaClient::new(&settings);
    if !client.is_available().await {
        return Err(Error::Ollama {
            message: format!(
                "Cannot reach Ollama at {}. Start it with 'ollama serve'.",
                settings.ollama_base_url
            ),
        });
    }

    let repo = extract_repo_name(&args.url)?;
    let path = clone_repo(&settings, &args.url, args.force)?;

    println!("Discovering files in {repo}...");
    let walker = FileWalker::new(settings.skip_patterns.clone());
    let files = walker.discover(&path)?;
    let stats = FileWalker::stats(&files);
    println!(
        "Discovered {} files across {} languages",
        stats.total_files,
        stats.files_by_language.len()
    );

    println!("Parsing and chunking...");
    let (chunks, report) = parse_and_chunk(&files, &path, settings.max_chunk_tokens);
    println!(
        "Parsed {} files into {} units ({} chunks, {} files skipped)",
        report.files_parsed, report.units, report.chunks, report.files_skipped
    );

    println!("Embedding {} chunks with {}...", chunks.len(), settings.embedding_model);
    let store = embed_and_store(&client, &settings, &repo, &chunks).await?;
    println!("Indexed {repo}: {} chunks stored.", store.len());
    println!("Try: codelens ask {repo} \"What does this project do?\"");

    Ok(())
}
