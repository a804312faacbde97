//! Chunk persistence and similarity search

mod vector;

pub use vector::{SearchFilter, SearchHit, StoredChunk, VectorStore};
