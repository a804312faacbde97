use crate::config::Settings;
use crate::error::Result;
use crate::ingest::list_cloned_repos;
use crate::store::VectorStore;

pub fn run() -> Result<()> {
    let settings = Settings::load()?;
    let indexed = VectorStore::list_repos()?;
    let cloned = list_cloned_repos(&settings)?;

    if indexed.is_empty() && cloned.is_empty() {
        println!("No repositories yet. Start with: codelens ingest <github_url>");
        return Ok(());
    }

    if !indexed.is_empty() {
        println!("Indexed:");
        for repo in &indexed {
            println!("  {repo}");
        }
    }

    let unindexed: Vec<_> = cloned
        .iter()
        .filter(|r| !indexed.contains(&r.name))
        .collect();
    if !unindexed.is_empty() {
        println!("Cloned but not indexed:");
        for repo in unindexed {
            println!("  {} ({} code files)", repo.name, repo.code_files);
        }
    }

    Ok(())
}
