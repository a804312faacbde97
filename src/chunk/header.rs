//! Context header construction
//!
//! The header tells the embedding model what and where a piece of code is,
//! which measurably improves retrieval quality.

use crate::parse::{CodeUnit, UnitKind};

/// Longest docstring excerpt included in a header
const DESCRIPTION_CHARS: usize = 200;

/// Build the pipe-joined context header prepended to a chunk's code
pub fn build_context_header(unit: &CodeUnit) -> String {
    let mut parts = vec![format!("File: {}", unit.file_path)];

    if !unit.parent_class.is_empty() {
        parts.push(format!("Class: {}", unit.parent_class));
        parts.push(format!("Method: {}", unit.name));
    } else {
        match unit.kind {
            UnitKind::Class => parts.push(format!("Class: {}", unit.name)),
            UnitKind::Function => parts.push(format!("Function: {}", unit.name)),
            UnitKind::Imports => parts.push("Section: imports".to_string()),
            UnitKind::ModuleDocstring => parts.push("Section: module docstring".to_string()),
            UnitKind::Method => parts.push(format!("Method: {}", unit.name)),
        }
    }

    parts.push(format!("Lines: {}-{}", unit.start_line, unit.end_line));
    parts.push(format!("Language: {}", unit.language));

    if !unit.docstring.is_empty() {
        let mut preview: String = unit.docstring.chars().take(DESCRIPTION_CHARS).collect();
        if unit.docstring.chars().count() > DESCRIPTION_CHARS {
            preview.push_str("...");
        }
        parts.push(format!("Description: {preview}"));
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(kind: UnitKind, name: &str, parent: &str, docstring: &str) -> CodeUnit {
        CodeUnit {
            kind,
            name: name.to_string(),
            code: String::new(),
            docstring: docstring.to_string(),
            start_line: 10,
            end_line: 20,
            file_path: "src/app.py".to_string(),
            language: "python".to_string(),
            parent_class: parent.to_string(),
        }
    }

    #[test]
    fn method_header_names_class_and_method() {
        let h = build_context_header(&unit(UnitKind::Method, "run", "Engine", ""));
        assert_eq!(
            h,
            "File: src/app.py | Class: Engine | Method: run | Lines: 10-20 | Language: python"
        );
    }

    #[test]
    fn section_headers_for_imports_and_module_docstring() {
        let h = build_context_header(&unit(UnitKind::Imports, "imports", "", ""));
        assert!(h.contains("Section: imports"));
        let h = build_context_header(&unit(UnitKind::ModuleDocstring, "module_docstring", "", ""));
        assert!(h.contains("Section: module docstring"));
    }

    #[test]
    fn long_docstring_is_truncated_with_ellipsis() {
        let long = "d".repeat(450);
        let h = build_context_header(&unit(UnitKind::Function, "f", "", &long));
        let desc = h.split("Description: ").nth(1).unwrap();
        assert_eq!(desc.len(), 203);
        assert!(desc.ends_with("..."));
    }

    #[test]
    fn short_docstring_is_kept_verbatim() {
        let h = build_context_header(&unit(UnitKind::Function, "f", "", "Does things."));
        assert!(h.ends_with("Description: Does things."));
    }
}
