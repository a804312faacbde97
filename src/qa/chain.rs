//! Retrieval-augmented answering

use tracing::debug;

use crate::config::Settings;
use crate::embed::{ChatMessage, OllamaClient};
use crate::error::Result;
use crate::qa::prompts::{format_context, user_message, SYSTEM_PROMPT};
use crate::store::{SearchFilter, SearchHit, VectorStore};

/// Where an answer's supporting code came from
#[derive(Debug, Clone)]
pub struct Source {
    pub file: String,
    pub lines: String,
    pub chunk_type: String,
    pub name: String,
    pub score: f32,
}

/// One answered question
#[derive(Debug)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Source>,
    pub chunks_used: usize,
}

/// Connects the vector store to the Ollama chat model
pub struct QaChain {
    client: OllamaClient,
    store: VectorStore,
    default_top_k: usize,
}

impl QaChain {
    /// Open the store for an indexed repo and prepare the chain
    pub fn open(settings: &Settings, repo: &str) -> Result<Self> {
        let store = VectorStore::open(repo)?;
        Ok(Self {
            client: OllamaClient::new(settings),
            store,
            default_top_k: settings.retrieval_top_k,
        })
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Answer a question using retrieved chunks as context
    pub async fn ask(
        &self,
        question: &str,
        top_k: Option<usize>,
        filter: &SearchFilter,
    ) -> Result<Answer> {
        let top_k = top_k.unwrap_or(self.default_top_k);

        let query = self.client.embed(question).await?;
        let hits = self.store.search(&query, top_k, filter);
        debug!(hits = hits.len(), top_k, "retrieved context");

        if hits.is_empty() {
            return Ok(Answer {
                answer: "No relevant code found in the indexed repository for this question."
                    .to_string(),
                sources: Vec::new(),
                chunks_used: 0,
            });
        }

        let context = format_context(&hits);
        let messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message(&context, question)),
        ];
        let answer = self.client.chat(messages).await?;

        Ok(Answer {
            answer,
            sources: sources_of(&hits),
            chunks_used: hits.len(),
        })
    }
}

fn sources_of(hits: &[SearchHit]) -> Vec<Source> {
    hits.iter()
        .map(|hit| {
            let m = &hit.chunk.metadata;
            Source {
                file: m.file_path.clone(),
                lines: format!("{}-{}", m.start_line, m.end_line),
                chunk_type: m.chunk_type.clone(),
                name: m.name.clone(),
                score: hit.score,
            }
        })
        .collect()
}
