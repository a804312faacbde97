//! In-memory vector store with JSON persistence
//!
//! One store per ingested repository, saved under the codelens home
//! directory. Brute-force cosine search is plenty at the scale of a single
//! repo's chunks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::chunk::{ChunkMetadata, CodeChunk};
use crate::config::Settings;
use crate::error::{Error, Result};

/// A chunk with its embedding, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Content hash, also the dedup key
    pub id: u64,
    pub content: String,
    pub code: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    repo: String,
    embedding_model: String,
    chunks: Vec<StoredChunk>,
}

/// Optional metadata constraints applied before similarity ranking
#[derive(Debug, Default, Clone)]
pub struct SearchFilter {
    pub language: Option<String>,
    pub chunk_type: Option<String>,
    pub path_contains: Option<String>,
}

impl SearchFilter {
    fn matches(&self, meta: &ChunkMetadata) -> bool {
        if let Some(lang) = &self.language {
            if !meta.language.eq_ignore_ascii_case(lang) {
                return false;
            }
        }
        if let Some(kind) = &self.chunk_type {
            if !meta.chunk_type.eq_ignore_ascii_case(kind) {
                return false;
            }
        }
        if let Some(fragment) = &self.path_contains {
            if !meta.file_path.contains(fragment.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub score: f32,
    pub chunk: StoredChunk,
}

/// Per-repository chunk store
pub struct VectorStore {
    repo: String,
    embedding_model: String,
    chunks: Vec<StoredChunk>,
    seen: HashSet<u64>,
}

impl VectorStore {
    pub fn new(repo: &str, embedding_model: &str) -> Self {
        Self {
            repo: repo.to_string(),
            embedding_model: embedding_model.to_string(),
            chunks: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Open the persisted store for a repo, erroring when none exists
    pub fn open(repo: &str) -> Result<Self> {
        let path = Self::store_path(repo)?;
        if !path.exists() {
            return Err(Error::StoreNotFound {
                repo: repo.to_string(),
            });
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        let seen = file.chunks.iter().map(|c| c.id).collect();
        debug!(repo = %file.repo, chunks = file.chunks.len(), "loaded vector store");
        Ok(Self {
            repo: file.repo,
            embedding_model: file.embedding_model,
            chunks: file.chunks,
            seen,
        })
    }

    /// Persist to the default per-repo location
    pub fn save(&self) -> Result<()> {
        let path = Self::store_path(&self.repo)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = StoreFile {
            repo: self.repo.clone(),
            embedding_model: self.embedding_model.clone(),
            chunks: self.chunks.clone(),
        };
        let json = serde_json::to_string(&file)?;
        std::fs::write(path, json)?;
        info!(repo = %self.repo, chunks = self.chunks.len(), path = %path.display(), "saved vector store");
        Ok(())
    }

    /// Add a chunk with its embedding. Returns false when an identical
    /// chunk (by content hash) is already stored.
    pub fn add(&mut self, chunk: &CodeChunk, embedding: Vec<f32>) -> bool {
        let id = xxh3_64(chunk.content.as_bytes());
        if !self.seen.insert(id) {
            return false;
        }
        self.chunks.push(StoredChunk {
            id,
            content: chunk.content.clone(),
            code: chunk.code.clone(),
            metadata: chunk.metadata.clone(),
            embedding,
        });
        true
    }

    /// Rank stored chunks by cosine similarity to the query vector
    pub fn search(&self, query: &[f32], top_k: usize, filter: &SearchFilter) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .chunks
            .iter()
            .filter(|c| filter.matches(&c.metadata))
            .map(|c| SearchHit {
                score: cosine_similarity(query, &c.embedding),
                chunk: c.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        hits
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn chunks(&self) -> &[StoredChunk] {
        &self.chunks
    }

    /// Names of all repos with a persisted store
    pub fn list_repos() -> Result<Vec<String>> {
        let dir = Settings::stores_dir()?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut repos = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    repos.push(stem.to_string());
                }
            }
        }
        repos.sort();
        Ok(repos)
    }

    /// Delete the persisted store for a repo
    pub fn delete(repo: &str) -> Result<()> {
        let path = Self::store_path(repo)?;
        if !path.exists() {
            return Err(Error::StoreNotFound {
                repo: repo.to_string(),
            });
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn store_path(repo: &str) -> Result<PathBuf> {
        Ok(Settings::stores_dir()?.join(format!("{repo}.json")))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
