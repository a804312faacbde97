//! Ollama client
//!
//! Two endpoints matter here: `/api/embed` for batched embeddings during
//! ingest and retrieval, and `/api/chat` for answer generation.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Settings, MAX_EMBED_CHARS};
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    embedding_model: String,
    llm_model: String,
    temperature: f32,
    max_tokens: i32,
}

impl OllamaClient {
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: settings.ollama_base_url.trim_end_matches('/').to_string(),
            embedding_model: settings.embedding_model.clone(),
            llm_model: settings.llm_model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    /// Check if Ollama is running and accessible
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Embed a batch of texts, preserving input order.
    ///
    /// Texts longer than the embedding model can handle are truncated
    /// before sending.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let input: Vec<String> = texts.iter().map(|t| truncate_chars(t, MAX_EMBED_CHARS)).collect();
        let request = EmbedRequest {
            model: self.embedding_model.clone(),
            input,
        };

        let url = format!("{}/api/embed", self.base_url);
        let res = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        if !res.status().is_success() {
            return Err(self.api_error("Embedding failed", res).await);
        }

        let response: EmbedResponse = res.json().await.map_err(|e| Error::Ollama {
            message: format!("Failed to parse embed response: {e}"),
        })?;

        if response.embeddings.len() != texts.len() {
            return Err(Error::Ollama {
                message: format!(
                    "Embedding count mismatch: sent {} texts, got {} vectors",
                    texts.len(),
                    response.embeddings.len()
                ),
            });
        }

        debug!(count = texts.len(), model = %self.embedding_model, "embedded batch");
        Ok(response.embeddings)
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| Error::Ollama {
            message: "Embed response contained no vectors".to_string(),
        })
    }

    /// Generate a chat completion
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatRequest {
            model: self.llm_model.clone(),
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        let res = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        if !res.status().is_success() {
            return Err(self.api_error("Chat failed", res).await);
        }

        let response: ChatResponse = res.json().await.map_err(|e| Error::Ollama {
            message: format!("Failed to parse chat response: {e}"),
        })?;

        Ok(response.message.content)
    }

    fn connection_error(&self, e: reqwest::Error) -> Error {
        if e.is_connect() {
            Error::Ollama {
                message: format!(
                    "Cannot connect to Ollama at {}. \
                    Make sure Ollama is running (ollama serve) or check your config.",
                    self.base_url
                ),
            }
        } else if e.is_timeout() {
            Error::Ollama {
                message: "Ollama request timed out. The model may still be loading.".to_string(),
            }
        } else {
            Error::Ollama {
                message: format!("Ollama request failed: {e}"),
            }
        }
    }

    async fn api_error(&self, context: &str, res: reqwest::Response) -> Error {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();

        if status.as_u16() == 404 && text.contains("model") {
            Error::Ollama {
                message: format!(
                    "Model not found. Run 'ollama pull {}' and 'ollama pull {}' to download.",
                    self.embedding_model, self.llm_model
                ),
            }
        } else {
            Error::Ollama {
                message: format!("{context}: HTTP {status} - {text}"),
            }
        }
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
