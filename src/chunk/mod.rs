//! Chunking: turning code units into size-bounded, embeddable chunks

mod chunker;
mod header;
mod tokens;

pub use chunker::{ChunkMetadata, CodeChunk, UnitChunker};
pub use header::build_context_header;
pub use tokens::{CharEstimator, TokenEstimator};
