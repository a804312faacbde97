use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input};

use crate::config::Settings;
use crate::error::Result;
use crate::qa::QaChain;
use crate::store::SearchFilter;

/// Arguments for the chat command
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Name of the indexed repository
    pub repo: String,

    /// Number of chunks to retrieve per question
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

pub async fn run(args: ChatArgs) -> Result<()> {
    let settings = Settings::load()?;
    let chain = QaChain::open(&settings, &args.repo)?;

    println!(
        "Chatting about {} ({} chunks indexed). Type 'exit' to quit.",
        args.repo,
        chain.store().len()
    );

    let theme = ColorfulTheme::default();
    loop {
        let question: String = Input::with_theme(&theme)
            .with_prompt("you")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| crate::error::Error::Config {
                message: format!("Failed to read input: {e}"),
            })?;

        let question = question.trim().to_string();
        if question.is_empty() {
            continue;
        }
        if matches!(question.as_str(), "exit" | "quit" | "q") {
            break;
        }

        match chain.ask(&question, args.top_k, &SearchFilter::default()).await {
            Ok(answer) => super::ask::print_answer(&answer),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
