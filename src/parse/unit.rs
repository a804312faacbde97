//! The code unit data model

/// The kind of structural unit extracted from a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Function,
    Method,
    Class,
    Imports,
    ModuleDocstring,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Function => "function",
            UnitKind::Method => "method",
            UnitKind::Class => "class",
            UnitKind::Imports => "imports",
            UnitKind::ModuleDocstring => "module_docstring",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structurally meaningful slice of one file.
///
/// Units are produced in top-to-bottom source order, a class immediately
/// followed by its methods. They are immutable once produced; their only
/// consumer is the chunker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    pub kind: UnitKind,
    /// Function/class name or descriptive label
    pub name: String,
    /// Exact source text, not normalized
    pub code: String,
    /// Extracted docstring, empty if absent
    pub docstring: String,
    /// Starting line number (1-indexed, inclusive)
    pub start_line: usize,
    /// Ending line number (1-indexed, inclusive)
    pub end_line: usize,
    /// Path relative to the repo root
    pub file_path: String,
    /// Detected language tag
    pub language: String,
    /// Enclosing class name when `kind` is `Method`, otherwise empty
    pub parent_class: String,
}

impl CodeUnit {
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn has_docstring(&self) -> bool {
        !self.docstring.is_empty()
    }
}
