//! Prompt templates for code Q&A

use crate::store::SearchHit;

pub const SYSTEM_PROMPT: &str = "You are CodeLens, an expert code analyst. You answer questions about codebases using retrieved source code as context.

## Your Rules

1. ALWAYS reference specific file paths and line numbers when citing code.
2. Show relevant code snippets to support your explanations.
3. Explain code in plain English FIRST, then show the code.
4. If the retrieved code does not answer the question, say so honestly. Do not make things up.
5. When you see connections between different parts of the codebase, point them out.
6. Use the metadata (file path, function name, class name) to give precise answers.
7. If the question is about architecture or flow, describe the sequence of calls across files.

## Response Format

When referencing code, use this format:

**File: `path/to/file.py` (lines 45-67)**
```python
# relevant code here
```

Keep explanations clear and concise. You are helping an engineer understand unfamiliar code quickly.";

/// Render retrieved chunks as a context block for the LLM
pub fn format_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| {
            let m = &hit.chunk.metadata;
            format!(
                "---\n\
                 **File:** `{}` (lines {}-{})\n\
                 **Type:** {} | **Name:** {} | **Language:** {}\n\n\
                 ```{}\n{}\n```\n\
                 ---",
                m.file_path,
                m.start_line,
                m.end_line,
                m.chunk_type,
                m.name,
                m.language,
                m.language,
                hit.chunk.content,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render the user turn containing context and question
pub fn user_message(context: &str, question: &str) -> String {
    format!("## Retrieved Code Context\n\n{context}\n\n## Question\n\n{question}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkMetadata;
    use crate::store::StoredChunk;

    fn hit() -> SearchHit {
        SearchHit {
            score: 0.9,
            chunk: StoredChunk {
                id: 1,
                content: "def f():\n    pass".to_string(),
                code: "def f():\n    pass".to_string(),
                metadata: ChunkMetadata {
                    file_path: "src/a.py".to_string(),
                    language: "python".to_string(),
                    chunk_type: "function".to_string(),
                    name: "f".to_string(),
                    parent_class: String::new(),
                    start_line: 3,
                    end_line: 4,
                    has_docstring: false,
                },
                embedding: vec![],
            },
        }
    }

    #[test]
    fn context_block_carries_provenance() {
        let context = format_context(&[hit()]);
        assert!(context.contains("**File:** `src/a.py` (lines 3-4)"));
        assert!(context.contains("**Type:** function | **Name:** f | **Language:** python"));
        assert!(context.contains("```python\ndef f():\n    pass\n```"));
    }

    #[test]
    fn user_message_embeds_context_and_question() {
        let msg = user_message("CTX", "How does routing work?");
        assert!(msg.starts_with("## Retrieved Code Context\n\nCTX"));
        assert!(msg.ends_with("## Question\n\nHow does routing work?"));
    }
}
