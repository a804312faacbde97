//! CodeLens - Codebase Q&A with RAG
//!
//! Turns source repositories into a searchable knowledge base: clone,
//! discover files, parse them into structural code units, chunk, embed
//! locally via Ollama, and answer questions with line-accurate citations.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod embed;
pub mod error;
pub mod ingest;
pub mod parse;
pub mod qa;
pub mod store;
pub mod tree;

pub use config::Settings;
pub use error::{Error, Result};
