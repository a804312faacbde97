//! Configuration management

use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings, loaded from `$CODELENS_HOME/config.toml` when
/// present, otherwise defaults mirroring a local Ollama setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the Ollama server
    pub ollama_base_url: String,
    /// Directory where cloned repositories live
    pub repos_dir: PathBuf,

    /// Ollama embedding model
    pub embedding_model: String,
    /// Number of chunks embedded per request batch
    pub embedding_batch_size: usize,

    /// Ollama chat model used for answers
    pub llm_model: String,
    /// Sampling temperature (low: precision over creativity)
    pub temperature: f32,
    /// Response length cap
    pub max_tokens: i32,

    /// Single-chunk admission threshold for the chunker
    pub max_chunk_tokens: usize,
    /// Declared overlap budget. Reserved: the line-based sliding window
    /// currently uses a fixed 3-line overlap instead.
    pub chunk_overlap_tokens: usize,

    /// Number of chunks retrieved per question
    pub retrieval_top_k: usize,

    /// Path fragments excluded from discovery and tree rendering
    pub skip_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            repos_dir: PathBuf::from("./repos"),
            embedding_model: "nomic-embed-text".to_string(),
            embedding_batch_size: 50,
            llm_model: "llama3.2".to_string(),
            temperature: 0.2,
            max_tokens: 2048,
            max_chunk_tokens: 500,
            chunk_overlap_tokens: 50,
            retrieval_top_k: 8,
            skip_patterns: default_skip_patterns(),
        }
    }
}

fn default_skip_patterns() -> Vec<String> {
    [
        ".git",
        "__pycache__",
        "node_modules",
        ".venv",
        "venv",
        ".env",
        "dist",
        "build",
        ".egg-info",
        ".tox",
        ".mypy_cache",
        ".pytest_cache",
        "*.min.js",
        "*.min.css",
        "package-lock.json",
        "yarn.lock",
        "poetry.lock",
        "Pipfile.lock",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::codelens_home()?.join("config.toml"))
    }

    /// Get the codelens home directory
    pub fn codelens_home() -> Result<PathBuf> {
        // Check CODELENS_HOME env var first
        if let Ok(home) = std::env::var("CODELENS_HOME") {
            return Ok(PathBuf::from(home));
        }

        // Use XDG directories
        ProjectDirs::from("dev", "codelens", "codelens")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::Config {
                message: "Could not determine codelens home directory".to_string(),
            })
    }

    /// Directory holding one persisted vector store per repository
    pub fn stores_dir() -> Result<PathBuf> {
        Ok(Self::codelens_home()?.join("stores"))
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::codelens_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }

    /// Check whether a path component matches one of the skip patterns
    pub fn should_skip(&self, name: &str) -> bool {
        self.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }
}

/// Maximum file size considered during discovery (1 MiB)
pub const MAX_FILE_SIZE: u64 = 1_048_576;

/// Fixed line overlap used by the sliding-window chunk split
pub const OVERLAP_LINES: usize = 3;

/// Character budget per text sent to the embedding model
/// (nomic-embed-text context is 2048 tokens; stay safely under)
pub const MAX_EMBED_CHARS: usize = 7000;
