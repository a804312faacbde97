//! File-level metadata for enriching chunks
//!
//! Each parsed file gets a natural-language summary embedded as its own
//! chunk, so questions like "what does this file do?" retrieve something
//! useful even when no single unit matches.

use crate::parse::{CodeUnit, UnitKind};

const PURPOSE_CHARS: usize = 300;
const CLASS_DOC_CHARS: usize = 100;

/// Build a natural-language summary of a file's contents
pub fn build_file_summary(file_path: &str, units: &[CodeUnit]) -> String {
    let mut parts = vec![format!("File: {file_path}")];

    if let Some(doc) = units
        .iter()
        .find(|u| u.kind == UnitKind::ModuleDocstring && !u.docstring.is_empty())
    {
        parts.push(format!("Purpose: {}", truncate(&doc.docstring, PURPOSE_CHARS)));
    }

    if let Some(imports) = units.iter().find(|u| u.kind == UnitKind::Imports) {
        parts.push(format!("Imports: {}", imports.code));
    }

    let functions: Vec<&str> = units
        .iter()
        .filter(|u| u.kind == UnitKind::Function)
        .map(|u| u.name.as_str())
        .collect();
    if !functions.is_empty() {
        parts.push(format!("Functions defined: {}", functions.join(", ")));
    }

    for class in units.iter().filter(|u| u.kind == UnitKind::Class) {
        let methods: Vec<&str> = units
            .iter()
            .filter(|u| u.kind == UnitKind::Method && u.parent_class == class.name)
            .map(|u| u.name.as_str())
            .collect();
        let doc = if class.docstring.is_empty() {
            String::new()
        } else {
            format!(" - {}", truncate(&class.docstring, CLASS_DOC_CHARS))
        };
        let method_list = if methods.is_empty() {
            String::new()
        } else {
            format!(" with methods: {}", methods.join(", "))
        };
        parts.push(format!("Class: {}{doc}{method_list}", class.name));
    }

    parts.join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
