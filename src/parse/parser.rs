//! AST-based extraction of code units using tree-sitter
//!
//! Walks only the top level of the syntax tree: module docstring, import
//! blocks, functions, and classes (whose methods become separate units).
//! Nested functions and classes stay verbatim inside their enclosing
//! unit's code; that shallowness is a documented limitation.

use crate::error::{Error, Result};
use crate::parse::unit::{CodeUnit, UnitKind};
use crate::parse::Language;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parses one file's bytes into an ordered list of code units.
///
/// Decoding is permissive (invalid bytes replaced) and structural
/// anomalies degrade to placeholder names; the only error surfaced is a
/// per-file parse failure, which callers treat as a skip signal.
pub struct StructuralParser {
    parser: Parser,
    language: Language,
}

impl StructuralParser {
    /// Create a parser for the reference grammar (Python)
    pub fn new() -> Result<Self> {
        Self::for_language(Language::Python)
    }

    /// Create a parser for any language with a grammar
    pub fn for_language(language: Language) -> Result<Self> {
        let grammar = language
            .tree_sitter_language()
            .ok_or_else(|| Error::Parse {
                message: format!("No grammar for language: {language}"),
            })?;
        let mut parser = Parser::new();
        parser.set_language(&grammar).map_err(|e| Error::Parse {
            message: format!("Failed to load grammar: {e}"),
        })?;
        Ok(Self { parser, language })
    }

    /// Parse a file into code units, in top-to-bottom source order.
    pub fn parse(
        &mut self,
        source: &[u8],
        file_path: &Path,
        repo_root: &Path,
    ) -> Result<Vec<CodeUnit>> {
        let text = String::from_utf8_lossy(source).into_owned();
        let rel_path = file_path
            .strip_prefix(repo_root)
            .unwrap_or(file_path)
            .to_string_lossy()
            .to_string();

        let tree = self
            .parser
            .parse(text.as_bytes(), None)
            .ok_or_else(|| Error::Parse {
                message: format!("Parser produced no tree for {rel_path}"),
            })?;
        let root = tree.root_node();
        let lines: Vec<&str> = text.split('\n').collect();
        let lang = self.language.as_str();

        let mut units: Vec<CodeUnit> = Vec::new();
        // Single open import group carried through the top-level fold.
        // Any non-import statement closes it; a later import starts a new
        // group rather than re-merging into a closed one.
        let mut open_imports: Option<CodeUnit> = None;
        // Only the very first statement can be the module docstring;
        // comments do not count as statements.
        let mut at_first_statement = true;

        let mut cursor = root.walk();
        for node in root.children(&mut cursor) {
            match node.kind() {
                "comment" => {}
                "import_statement" | "import_from_statement" | "future_import_statement" => {
                    at_first_statement = false;
                    match open_imports.as_mut() {
                        Some(group) => {
                            group.code.push('\n');
                            group.code.push_str(&text_for_node(node, &lines));
                            group.end_line = node.end_position().row + 1;
                        }
                        None => {
                            open_imports = Some(CodeUnit {
                                kind: UnitKind::Imports,
                                name: "imports".to_string(),
                                code: text_for_node(node, &lines),
                                docstring: String::new(),
                                start_line: node.start_position().row + 1,
                                end_line: node.end_position().row + 1,
                                file_path: rel_path.clone(),
                                language: lang.to_string(),
                                parent_class: String::new(),
                            });
                        }
                    }
                }
                other => {
                    if let Some(group) = open_imports.take() {
                        units.push(group);
                    }
                    let was_first = at_first_statement;
                    at_first_statement = false;
                    match other {
                        "expression_statement" => {
                            // Only the first statement of the module counts
                            // as its docstring.
                            if was_first {
                                if let Some(unit) =
                                    module_docstring_unit(node, &lines, &rel_path, lang)
                                {
                                    units.push(unit);
                                }
                            }
                        }
                        "function_definition" => {
                            units.push(function_unit(node, &lines, &rel_path, lang, ""));
                        }
                        "class_definition" => {
                            units.extend(class_units(node, &lines, &rel_path, lang));
                        }
                        "decorated_definition" => {
                            let mut inner = node.walk();
                            for child in node.children(&mut inner) {
                                match child.kind() {
                                    "function_definition" => {
                                        // Extent covers the decorators too
                                        units.push(function_unit(
                                            node, &lines, &rel_path, lang, "",
                                        ));
                                    }
                                    "class_definition" => {
                                        units.extend(class_units(node, &lines, &rel_path, lang));
                                    }
                                    _ => {}
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if let Some(group) = open_imports.take() {
            units.push(group);
        }

        Ok(units)
    }
}

/// Build a module docstring unit if this expression statement is a bare string
fn module_docstring_unit(
    node: Node,
    lines: &[&str],
    rel_path: &str,
    lang: &str,
) -> Option<CodeUnit> {
    let first = node.child(0)?;
    if first.kind() != "string" {
        return None;
    }
    let docstring = strip_string_delimiters(&text_for_node(first, lines));
    Some(CodeUnit {
        kind: UnitKind::ModuleDocstring,
        name: "module_docstring".to_string(),
        code: text_for_node(node, lines),
        docstring,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        file_path: rel_path.to_string(),
        language: lang.to_string(),
        parent_class: String::new(),
    })
}

/// Build a function or method unit from a (possibly decorated) definition
fn function_unit(
    node: Node,
    lines: &[&str],
    rel_path: &str,
    lang: &str,
    parent_class: &str,
) -> CodeUnit {
    let name = function_name(node, lines).unwrap_or_else(|| "unknown_function".to_string());
    let kind = if parent_class.is_empty() {
        UnitKind::Function
    } else {
        UnitKind::Method
    };

    CodeUnit {
        kind,
        name,
        code: text_for_node(node, lines),
        docstring: docstring_of_definition(node, lines),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        file_path: rel_path.to_string(),
        language: lang.to_string(),
        parent_class: parent_class.to_string(),
    }
}

/// Resolve a function name: first identifier child of the definition node,
/// digging through a decorated wrapper if needed.
fn function_name(node: Node, lines: &[&str]) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "identifier" {
            return Some(text_for_node(child, lines));
        }
        if child.kind() == "function_definition" {
            let mut inner = child.walk();
            for sub in child.children(&mut inner) {
                if sub.kind() == "identifier" {
                    return Some(text_for_node(sub, lines));
                }
            }
            return None;
        }
    }
    None
}

/// Build a class unit followed by one method unit per function directly
/// inside the class body.
fn class_units(node: Node, lines: &[&str], rel_path: &str, lang: &str) -> Vec<CodeUnit> {
    let mut class_name = String::new();
    let mut class_body: Option<Node> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "identifier" => class_name = text_for_node(child, lines),
            "block" => class_body = Some(child),
            // Decorated class: dig into the actual class node
            "class_definition" => {
                let mut inner = child.walk();
                for sub in child.children(&mut inner) {
                    match sub.kind() {
                        "identifier" => class_name = text_for_node(sub, lines),
                        "block" => class_body = Some(sub),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if class_name.is_empty() {
        class_name = "UnknownClass".to_string();
    }

    let docstring = class_body
        .map(|body| docstring_of_body(body, lines))
        .unwrap_or_default();

    let mut units = vec![CodeUnit {
        kind: UnitKind::Class,
        name: class_name.clone(),
        code: text_for_node(node, lines),
        docstring,
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
        file_path: rel_path.to_string(),
        language: lang.to_string(),
        parent_class: String::new(),
    }];

    if let Some(body) = class_body {
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    units.push(function_unit(child, lines, rel_path, lang, &class_name));
                }
                "decorated_definition" => {
                    let mut inner = child.walk();
                    let has_fn = child
                        .children(&mut inner)
                        .any(|sub| sub.kind() == "function_definition");
                    if has_fn {
                        units.push(function_unit(child, lines, rel_path, lang, &class_name));
                    }
                }
                _ => {}
            }
        }
    }

    units
}

/// Docstring of a function or class definition node
fn docstring_of_definition(node: Node, lines: &[&str]) -> String {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "block" {
            return docstring_of_body(child, lines);
        }
        if child.kind() == "function_definition" {
            return docstring_of_definition(child, lines);
        }
    }
    String::new()
}

/// Docstring of a body: only the first statement counts, and leading
/// comments do not disqualify it.
fn docstring_of_body(body: Node, lines: &[&str]) -> String {
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "comment" => continue,
            "expression_statement" => {
                if let Some(first) = child.child(0) {
                    if first.kind() == "string" {
                        return strip_string_delimiters(&text_for_node(first, lines));
                    }
                }
                return String::new();
            }
            _ => return String::new(),
        }
    }
    String::new()
}

/// Extract the source text for a node, whole lines for multi-line spans
fn text_for_node(node: Node, lines: &[&str]) -> String {
    let start = node.start_position();
    let end = node.end_position();

    if start.row == end.row {
        return lines
            .get(start.row)
            .and_then(|line| line.get(start.column..end.column))
            .unwrap_or_default()
            .to_string();
    }

    let last = end.row.min(lines.len().saturating_sub(1));
    lines[start.row..=last].join("\n")
}

/// Strip surrounding quote delimiters from a string literal and trim
fn strip_string_delimiters(text: &str) -> String {
    let t = text.trim();
    for quote in ["\"\"\"", "'''"] {
        if t.len() >= 6 && t.starts_with(quote) && t.ends_with(quote) {
            return t[3..t.len() - 3].trim().to_string();
        }
    }
    for quote in ["\"", "'"] {
        if t.len() >= 2 && t.starts_with(quote) && t.ends_with(quote) {
            return t[1..t.len() - 1].trim().to_string();
        }
    }
    t.to_string()
}
