//! Question answering over an indexed repository

mod chain;
mod prompts;

pub use chain::{Answer, QaChain, Source};
pub use prompts::{format_context, SYSTEM_PROMPT};
