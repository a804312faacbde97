//! Error types for CodeLens

use thiserror::Error;

/// Result type alias using CodeLens's Error
pub type Result<T> = std::result::Result<T, Error>;

/// CodeLens error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository not found: {path}")]
    RepoNotFound { path: String },

    #[error("Invalid GitHub URL: {url} (expected https://github.com/owner/repo)")]
    InvalidRepoUrl { url: String },

    #[error("Clone failed: {message}")]
    Clone { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("No index found for repository: {repo}. Run 'codelens ingest' first.")]
    StoreNotFound { repo: String },

    #[error("Ollama error: {message}")]
    Ollama { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
