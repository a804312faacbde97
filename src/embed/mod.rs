//! Ollama HTTP client for embeddings and chat

mod ollama;

pub use ollama::{ChatMessage, OllamaClient};
