//! Visual directory tree of a repository

use std::path::Path;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::parse::Language;

/// Render a text tree of the repository, directories first, skip patterns
/// applied, with code file counts on directories and sizes on files.
pub fn build_tree(settings: &Settings, repo_path: &Path, max_depth: usize) -> Result<String> {
    if !repo_path.is_dir() {
        return Err(Error::RepoNotFound {
            path: repo_path.display().to_string(),
        });
    }

    let name = repo_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_path.display().to_string());
    let mut lines = vec![format!("{name}/")];
    walk(settings, repo_path, &mut lines, "", 0, max_depth)?;
    Ok(lines.join("\n"))
}

fn walk(
    settings: &Settings,
    dir: &Path,
    lines: &mut Vec<String>,
    prefix: &str,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    if depth >= max_depth {
        return Ok(());
    }

    let mut entries: Vec<(bool, String, std::path::PathBuf)> = Vec::new();
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        // unreadable directories are simply not descended into
        Err(_) => return Ok(()),
    };
    for entry in read.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if settings.should_skip(&name) {
            continue;
        }
        entries.push((path.is_dir(), name, path));
    }
    entries.sort_by(|a, b| (!a.0, a.1.to_lowercase()).cmp(&(!b.0, b.1.to_lowercase())));

    let count = entries.len();
    for (i, (is_dir, name, path)) in entries.into_iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let extension = if is_last { "    " } else { "│   " };

        if is_dir {
            let code_count = count_code_files(settings, &path);
            let suffix = if code_count > 0 {
                format!("  ({code_count} files)")
            } else {
                String::new()
            };
            lines.push(format!("{prefix}{connector}{name}/{suffix}"));
            walk(
                settings,
                &path,
                lines,
                &format!("{prefix}{extension}"),
                depth + 1,
                max_depth,
            )?;
        } else {
            let size = path.metadata().map(|m| m.len()).unwrap_or(0);
            lines.push(format!("{prefix}{connector}{name}  [{}]", format_size(size)));
        }
    }
    Ok(())
}

fn count_code_files(settings: &Settings, dir: &Path) -> usize {
    let mut count = 0;
    let Ok(read) = std::fs::read_dir(dir) else {
        return 0;
    };
    for entry in read.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if settings.should_skip(&name) {
            continue;
        }
        if path.is_dir() {
            count += count_code_files(settings, &path);
        } else if Language::from_path(&path) != Language::Unknown {
            count += 1;
        }
    }
    count
}

fn format_size(size_bytes: u64) -> String {
    if size_bytes < 1024 {
        format!("{size_bytes}B")
    } else if size_bytes < 1024 * 1024 {
        format!("{:.1}KB", size_bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", size_bytes as f64 / (1024.0 * 1024.0))
    }
}
