//! Structural extraction: file discovery and AST parsing into code units

mod languages;
mod parser;
mod unit;
mod walker;

pub use languages::Language;
pub use parser::StructuralParser;
pub use unit::{CodeUnit, UnitKind};
pub use walker::{FileWalker, RepoStats, SourceFile};
