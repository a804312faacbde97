//! Cloning and managing GitHub repositories

use std::path::PathBuf;
use std::process::Command;

use tracing::info;
use url::Url;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::parse::FileWalker;

/// Extract the repository name from a GitHub URL.
///
/// `https://github.com/owner/repo` and `.../repo.git` both yield `repo`.
pub fn extract_repo_name(repo_url: &str) -> Result<String> {
    let invalid = || Error::InvalidRepoUrl {
        url: repo_url.to_string(),
    };

    let parsed = Url::parse(repo_url).map_err(|_| invalid())?;
    let segments: Vec<&str> = parsed
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if segments.len() < 2 {
        return Err(invalid());
    }

    let name = segments[segments.len() - 1];
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        return Err(invalid());
    }
    Ok(name.to_string())
}

/// Shallow-clone a repository into the repos directory.
///
/// An existing clone is reused unless `force` is set, in which case it is
/// removed and cloned fresh.
pub fn clone_repo(settings: &Settings, repo_url: &str, force: bool) -> Result<PathBuf> {
    let name = extract_repo_name(repo_url)?;
    let target = settings.repos_dir.join(&name);

    if target.exists() {
        if force {
            info!(path = %target.display(), "removing existing clone");
            std::fs::remove_dir_all(&target)?;
        } else {
            info!(path = %target.display(), "repository already cloned");
            return Ok(target);
        }
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!(url = repo_url, "cloning repository");
    let output = Command::new("git")
        .args(["clone", "--depth", "1", repo_url])
        .arg(&target)
        .output()
        .map_err(|e| Error::Clone {
            message: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Clone {
            message: format!("git clone of {repo_url} failed: {}", stderr.trim()),
        });
    }

    Ok(target)
}

/// A cloned repository with basic stats
#[derive(Debug)]
pub struct ClonedRepo {
    pub name: String,
    pub path: PathBuf,
    pub code_files: usize,
}

/// List all repositories under the repos directory
pub fn list_cloned_repos(settings: &Settings) -> Result<Vec<ClonedRepo>> {
    if !settings.repos_dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = FileWalker::new(settings.skip_patterns.clone());
    let mut repos = Vec::new();
    for entry in std::fs::read_dir(&settings.repos_dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) if !n.starts_with('.') => n.to_string(),
            _ => continue,
        };
        if !path.is_dir() {
            continue;
        }
        let code_files = walker.discover(&path).map(|f| f.len()).unwrap_or(0);
        repos.push(ClonedRepo {
            name,
            path,
            code_files,
        });
    }

    repos.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(repos)
}

/// Delete a cloned repository
pub fn delete_repo(settings: &Settings, name: &str) -> Result<()> {
    let target = settings.repos_dir.join(name);
    if !target.exists() {
        return Err(Error::RepoNotFound {
            path: target.display().to_string(),
        });
    }
    std::fs::remove_dir_all(&target)?;
    info!(name, "deleted repository");
    Ok(())
}
