//! Language detection and tree-sitter grammar loading

use std::path::Path;

/// Languages recognized during file discovery.
///
/// Python is the reference grammar with full structural extraction; the
/// rest are detected so chunks carry an accurate `language` tag, and get a
/// grammar here when structural support is added for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Go,
    Rust,
    C,
    Cpp,
    Ruby,
    Markdown,
    Text,
    Yaml,
    Json,
    Toml,
    Unknown,
}

impl Language {
    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "java" => Language::Java,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "c" | "h" => Language::C,
            "cpp" | "hpp" | "cc" | "cxx" => Language::Cpp,
            "rb" => Language::Ruby,
            "md" | "mdx" => Language::Markdown,
            "txt" => Language::Text,
            "yaml" | "yml" => Language::Yaml,
            "json" => Language::Json,
            "toml" => Language::Toml,
            _ => Language::Unknown,
        }
    }

    /// Get the language name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Markdown => "markdown",
            Language::Text => "text",
            Language::Yaml => "yaml",
            Language::Json => "json",
            Language::Toml => "toml",
            Language::Unknown => "unknown",
        }
    }

    /// Check if this language has structural (tree-sitter) support
    pub fn has_ast_support(&self) -> bool {
        self.tree_sitter_language().is_some()
    }

    /// Get the tree-sitter grammar for this language
    pub fn tree_sitter_language(&self) -> Option<tree_sitter::Language> {
        match self {
            Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(Language::from_path(Path::new("foo.py")), Language::Python);
        assert_eq!(Language::from_path(Path::new("foo.pyi")), Language::Python);
        assert_eq!(Language::from_path(Path::new("bar.rs")), Language::Rust);
        assert_eq!(Language::from_path(Path::new("baz.md")), Language::Markdown);
        assert_eq!(Language::from_path(Path::new("x.xyz")), Language::Unknown);
    }

    #[test]
    fn only_python_has_ast_support() {
        assert!(Language::Python.has_ast_support());
        assert!(!Language::Rust.has_ast_support());
        assert!(!Language::Markdown.has_ast_support());
    }
}
