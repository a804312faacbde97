use clap::Parser;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::ingest::delete_repo;
use crate::store::VectorStore;

/// Arguments for the delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Name of the repository to remove
    pub repo: String,
}

pub fn run(args: DeleteArgs) -> Result<()> {
    let settings = Settings::load()?;

    let mut removed = false;
    match VectorStore::delete(&args.repo) {
        Ok(()) => {
            println!("Removed index for {}", args.repo);
            removed = true;
        }
        Err(Error::StoreNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    match delete_repo(&settings, &args.repo) {
        Ok(()) => {
            println!("Removed clone of {}", args.repo);
            removed = true;
        }
        Err(Error::RepoNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    if !removed {
        println!("Nothing to remove for {}", args.repo);
    }
    Ok(())
}
