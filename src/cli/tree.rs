use clap::Parser;

use crate::config::Settings;
use crate::error::Result;
use crate::tree::build_tree;

/// Arguments for the tree command
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Name of a cloned repository
    pub repo: String,

    /// How deep to traverse
    #[arg(short, long, default_value = "3")]
    pub depth: usize,
}

pub fn run(args: TreeArgs) -> Result<()> {
    let settings = Settings::load()?;
    let repo_path = settings.repos_dir.join(&args.repo);
    let tree = build_tree(&settings, &repo_path, args.depth)?;
    println!("{tree}");
    Ok(())
}
