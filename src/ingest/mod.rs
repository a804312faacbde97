//! Ingestion: cloning, parsing, chunking, embedding, storing

mod cloner;
mod metadata;
mod pipeline;

pub use cloner::{clone_repo, delete_repo, extract_repo_name, list_cloned_repos, ClonedRepo};
pub use metadata::build_file_summary;
pub use pipeline::{embed_and_store, parse_and_chunk, IngestReport};
