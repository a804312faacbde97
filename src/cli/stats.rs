use std::collections::BTreeMap;

use clap::Parser;

use crate::error::Result;
use crate::store::VectorStore;

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Name of the indexed repository
    pub repo: String,
}

pub fn run(args: StatsArgs) -> Result<()> {
    let store = VectorStore::open(&args.repo)?;

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_language: BTreeMap<&str, usize> = BTreeMap::new();
    let mut files: std::collections::BTreeSet<&str> = Default::default();
    for chunk in store.chunks() {
        *by_type.entry(chunk.metadata.chunk_type.as_str()).or_insert(0) += 1;
        *by_language.entry(chunk.metadata.language.as_str()).or_insert(0) += 1;
        files.insert(chunk.metadata.file_path.as_str());
    }

    println!("{}", store.repo());
    println!("  embedding model: {}", store.embedding_model());
    println!("  chunks: {}", store.len());
    println!("  files: {}", files.len());
    println!("  by type:");
    for (kind, count) in &by_type {
        println!("    {kind}: {count}");
    }
    println!("  by language:");
    for (language, count) in &by_language {
        println!("    {language}: {count}");
    }

    Ok(())
}
