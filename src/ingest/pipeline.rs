//! The ingestion pipeline
//!
//! Parsing and chunking are pure per-file work and run in parallel; results
//! are merged back in discovery order so repeated runs over the same tree
//! produce chunks in the same sequence. Embedding happens afterwards in
//! batches against Ollama.

use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::chunk::{CharEstimator, ChunkMetadata, CodeChunk, TokenEstimator, UnitChunker};
use crate::config::Settings;
use crate::embed::OllamaClient;
use crate::error::Result;
use crate::ingest::metadata::build_file_summary;
use crate::parse::{SourceFile, StructuralParser};
use crate::store::VectorStore;

/// Counters reported after the parse and chunk phase
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub files_total: usize,
    /// Files parsed into units
    pub files_parsed: usize,
    /// Files with no structural grammar, carried only in stats
    pub files_unsupported: usize,
    /// Files that could not be read or parsed
    pub files_skipped: usize,
    pub units: usize,
    pub chunks: usize,
}

/// Parse and chunk discovered files.
///
/// Output order follows the input file order exactly, with each file's
/// chunks in unit order and a file summary chunk last.
pub fn parse_and_chunk(
    files: &[SourceFile],
    repo_root: &Path,
    max_chunk_tokens: usize,
) -> (Vec<CodeChunk>, IngestReport) {
    enum FileOutcome {
        Parsed(Vec<CodeChunk>, usize),
        Unsupported,
        Skipped,
    }

    let results: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| {
            if !file.language.has_ast_support() {
                return FileOutcome::Unsupported;
            }
            match process_file(file, repo_root, max_chunk_tokens) {
                Ok((chunks, units)) => FileOutcome::Parsed(chunks, units),
                Err(e) => {
                    warn!(path = %file.rel_path, error = %e, "skipping file");
                    FileOutcome::Skipped
                }
            }
        })
        .collect();

    let mut report = IngestReport {
        files_total: files.len(),
        ..Default::default()
    };
    let mut chunks = Vec::new();
    for result in results {
        match result {
            FileOutcome::Unsupported => report.files_unsupported += 1,
            FileOutcome::Skipped => report.files_skipped += 1,
            FileOutcome::Parsed(file_chunks, unit_count) => {
                report.files_parsed += 1;
                report.units += unit_count;
                report.chunks += file_chunks.len();
                chunks.extend(file_chunks);
            }
        }
    }

    info!(
        files = report.files_parsed,
        skipped = report.files_skipped,
        units = report.units,
        chunks = report.chunks,
        "parse and chunk complete"
    );
    (chunks, report)
}

fn process_file(
    file: &SourceFile,
    repo_root: &Path,
    max_chunk_tokens: usize,
) -> Result<(Vec<CodeChunk>, usize)> {
    let source = std::fs::read(&file.abs_path)?;
    let mut parser = StructuralParser::for_language(file.language)?;
    let units = parser.parse(&source, &file.abs_path, repo_root)?;

    let chunker = UnitChunker::new(max_chunk_tokens);
    let mut chunks = Vec::new();
    for unit in &units {
        chunks.extend(chunker.chunk(unit));
    }

    if !units.is_empty() {
        chunks.push(file_summary_chunk(file, &units));
    }

    Ok((chunks, units.len()))
}

fn file_summary_chunk(file: &SourceFile, units: &[crate::parse::CodeUnit]) -> CodeChunk {
    let summary = build_file_summary(&file.rel_path, units);
    let end_line = units.iter().map(|u| u.end_line).max().unwrap_or(1);
    let token_estimate = CharEstimator.estimate(&summary);
    CodeChunk {
        content: summary.clone(),
        code: summary,
        metadata: ChunkMetadata {
            file_path: file.rel_path.clone(),
            language: file.language.as_str().to_string(),
            chunk_type: "file_summary".to_string(),
            name: file.rel_path.clone(),
            parent_class: String::new(),
            start_line: 1,
            end_line,
            has_docstring: false,
        },
        token_estimate,
    }
}

/// Embed chunks in batches and persist them in a per-repo store
pub async fn embed_and_store(
    client: &OllamaClient,
    settings: &Settings,
    repo: &str,
    chunks: &[CodeChunk],
) -> Result<VectorStore> {
    let mut store = VectorStore::new(repo, &settings.embedding_model);
    let batch_size = settings.embedding_batch_size.max(1);

    let mut embedded = 0usize;
    let mut duplicates = 0usize;
    for batch in chunks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let vectors = client.embed_batch(&texts).await?;
        for (chunk, vector) in batch.iter().zip(vectors) {
            if store.add(chunk, vector) {
                embedded += 1;
            } else {
                duplicates += 1;
            }
        }
        info!(embedded, total = chunks.len(), "embedding progress");
    }

    if duplicates > 0 {
        info!(duplicates, "dropped duplicate chunks");
    }
    store.save()?;
    Ok(store)
}
