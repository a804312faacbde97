use clap::Parser;

use crate::config::Settings;
use crate::error::Result;
use crate::qa::{Answer, QaChain};
use crate::store::SearchFilter;

/// Arguments for the ask command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    codelens ask fastapi \"How does dependency injection work?\"
    codelens ask fastapi \"Where is auth handled?\" --path security
    codelens ask fastapi \"List the routing classes\" --kind class -k 12")]
pub struct AskArgs {
    /// Name of the indexed repository
    pub repo: String,

    /// The question to ask
    pub question: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Only consider chunks in this language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Only consider chunks whose file path contains this fragment
    #[arg(short, long)]
    pub path: Option<String>,

    /// Only consider chunks of this type (function, method, class, ...)
    #[arg(long)]
    pub kind: Option<String>,
}

pub async fn run(args: AskArgs) -> Result<()> {
    let settings = Settings::load()?;
    let chain = QaChain::open(&settings, &args.repo)?;

    let filter = SearchFilter {
        language: args.language,
        chunk_type: args.kind,
        path_contains: args.path,
    };

    println!("Thinking...");
    let answer = chain.ask(&args.question, args.top_k, &filter).await?;
    print_answer(&answer);
    Ok(())
}

pub(crate) fn print_answer(answer: &Answer) {
    println!("\n{}\n", answer.answer);
    if !answer.sources.is_empty() {
        println!("Sources ({} chunks used):", answer.chunks_used);
        for s in &answer.sources {
            println!(
                "  {}:{} ({}: {}) score={:.3}",
                s.file, s.lines, s.chunk_type, s.name, s.score
            );
        }
    }
}
