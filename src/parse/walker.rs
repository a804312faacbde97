//! Repository file discovery

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::config::MAX_FILE_SIZE;
use crate::error::{Error, Result};
use crate::parse::Language;

/// One discovered file, with enough context to parse and report on it
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the repo root, forward-slash separated
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub language: Language,
    pub size_bytes: u64,
}

/// Aggregate discovery numbers for display
#[derive(Debug, Default)]
pub struct RepoStats {
    pub total_files: usize,
    pub total_bytes: u64,
    pub files_by_language: BTreeMap<&'static str, usize>,
}

/// Walks a repository respecting .gitignore, returning recognized source
/// files in a stable path order.
pub struct FileWalker {
    skip_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(skip_patterns: Vec<String>) -> Self {
        Self { skip_patterns }
    }

    /// Discover all indexable files under `root`, sorted by relative path
    pub fn discover(&self, root: &Path) -> Result<Vec<SourceFile>> {
        if !root.is_dir() {
            return Err(Error::RepoNotFound {
                path: root.display().to_string(),
            });
        }

        let patterns = self.skip_patterns.clone();
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .filter_entry(move |entry| {
                let name = entry.file_name().to_string_lossy();
                !matches_skip_pattern(&patterns, &name)
            })
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            let size = match path.metadata() {
                Ok(meta) => meta.len(),
                Err(_) => continue,
            };
            if size == 0 || size > MAX_FILE_SIZE {
                debug!(path = %path.display(), size, "skipping file by size");
                continue;
            }

            let language = Language::from_path(path);
            if language == Language::Unknown {
                continue;
            }

            let rel = path.strip_prefix(root).unwrap_or(path);
            files.push(SourceFile {
                rel_path: rel_path_string(rel),
                abs_path: path.to_path_buf(),
                language,
                size_bytes: size,
            });
        }

        files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(files)
    }

    pub fn stats(files: &[SourceFile]) -> RepoStats {
        let mut stats = RepoStats {
            total_files: files.len(),
            ..Default::default()
        };
        for file in files {
            stats.total_bytes += file.size_bytes;
            *stats.files_by_language.entry(file.language.as_str()).or_insert(0) += 1;
        }
        stats
    }
}

fn matches_skip_pattern(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            name.ends_with(suffix)
        } else {
            name == pattern
        }
    })
}

fn rel_path_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn walker() -> FileWalker {
        FileWalker::new(crate::Settings::default().skip_patterns)
    }

    #[test]
    fn discovers_recognized_files_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/b.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("a.py"), "y = 2\n").unwrap();
        fs::write(dir.path().join("README.md"), "# hi\n").unwrap();

        let files = walker().discover(dir.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["README.md", "a.py", "src/b.py"]);
        assert_eq!(files[1].language, Language::Python);
    }

    #[test]
    fn skips_empty_files_and_skip_pattern_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.py"), "").unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/lib.js"), "var x;\n").unwrap();
        fs::write(dir.path().join("app.min.js"), "var y;\n").unwrap();
        fs::write(dir.path().join("main.py"), "z = 3\n").unwrap();

        let files = walker().discover(dir.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["main.py"]);
    }

    #[test]
    fn skips_unrecognized_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.bin"), "junk").unwrap();
        fs::write(dir.path().join("main.py"), "z = 3\n").unwrap();

        let files = walker().discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_path, "main.py");
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = walker().discover(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, Error::RepoNotFound { .. }));
    }

    #[test]
    fn stats_aggregate_by_language() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("b.py"), "y = 2\n").unwrap();
        fs::write(dir.path().join("doc.md"), "# doc\n").unwrap();

        let files = walker().discover(dir.path()).unwrap();
        let stats = FileWalker::stats(&files);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.files_by_language.get("python"), Some(&2));
        assert_eq!(stats.files_by_language.get("markdown"), Some(&1));
    }
}
