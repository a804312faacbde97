//! Size-bounded chunking of code units
//!
//! Every unit becomes at least one chunk. Units that fit the token budget
//! pass through whole; classes are trimmed to a structural skeleton;
//! functions split at the docstring/body boundary; anything still too big
//! falls back to a sliding line window.

use serde::{Deserialize, Serialize};

use crate::chunk::header::build_context_header;
use crate::chunk::tokens::{CharEstimator, TokenEstimator};
use crate::config::OVERLAP_LINES;
use crate::parse::{CodeUnit, UnitKind};

/// Flat descriptor attached to every chunk, used for filtering and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    pub language: String,
    /// Kind of the originating unit ("function", "class", ...)
    pub chunk_type: String,
    /// Unit name, suffixed for sub-chunks ("(signature)", "(body part 2)")
    pub name: String,
    pub parent_class: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Whether the originating unit had a docstring, not this sub-chunk
    pub has_docstring: bool,
}

/// One embeddable piece of a code unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChunk {
    /// Context header + code, the text that gets embedded
    pub content: String,
    /// Raw code slice without the header
    pub code: String,
    pub metadata: ChunkMetadata,
    pub token_estimate: usize,
}

/// Splits code units into chunks that respect a token budget
pub struct UnitChunker {
    max_chunk_tokens: usize,
    estimator: Box<dyn TokenEstimator>,
}

impl UnitChunker {
    pub fn new(max_chunk_tokens: usize) -> Self {
        Self {
            max_chunk_tokens,
            estimator: Box::new(CharEstimator),
        }
    }

    pub fn with_estimator(max_chunk_tokens: usize, estimator: Box<dyn TokenEstimator>) -> Self {
        Self {
            max_chunk_tokens,
            estimator,
        }
    }

    pub fn estimate(&self, text: &str) -> usize {
        self.estimator.estimate(text)
    }

    /// Chunk one unit. Always returns at least one chunk.
    pub fn chunk(&self, unit: &CodeUnit) -> Vec<CodeChunk> {
        let header = build_context_header(unit);
        let full = format!("{header}\n\n{}", unit.code);

        if self.estimator.estimate(&full) <= self.max_chunk_tokens {
            return vec![self.make_chunk(
                unit,
                unit.name.clone(),
                unit.code.clone(),
                full,
                unit.start_line,
                unit.end_line,
            )];
        }

        match unit.kind {
            UnitKind::Class => vec![self.trimmed_class_chunk(unit, &header)],
            UnitKind::Function | UnitKind::Method => self.split_function(unit, &header),
            _ => {
                let lines: Vec<&str> = unit.code.split('\n').collect();
                self.sliding_windows(unit, &header, &lines, unit.start_line, |part| {
                    format!("{} (part {part})", unit.name)
                })
            }
        }
    }

    /// Render an oversized class as its structural skeleton.
    ///
    /// The chunk's `code` stays the full class source so the unit remains
    /// reconstructable; only the embedded `content` is trimmed. This is the
    /// one chunk shape allowed to exceed the token budget.
    fn trimmed_class_chunk(&self, unit: &CodeUnit, header: &str) -> CodeChunk {
        let skeleton = trim_class(&unit.code);
        let content = format!("{header}\n\n{skeleton}");
        self.make_chunk(
            unit,
            unit.name.clone(),
            unit.code.clone(),
            content,
            unit.start_line,
            unit.end_line,
        )
    }

    /// Split a function into a signature chunk and one or more body chunks
    fn split_function(&self, unit: &CodeUnit, header: &str) -> Vec<CodeChunk> {
        let lines: Vec<&str> = unit.code.split('\n').collect();
        let boundary = docstring_boundary(&lines)
            .unwrap_or_else(|| 5.min(lines.len()))
            .clamp(1, lines.len());

        let sig_code = lines[..boundary].join("\n");
        let mut chunks = vec![self.make_chunk(
            unit,
            format!("{} (signature)", unit.name),
            sig_code.clone(),
            format!("{header}\n\n{sig_code}"),
            unit.start_line,
            unit.start_line + boundary - 1,
        )];

        let body_lines = &lines[boundary..];
        if body_lines.is_empty() {
            return chunks;
        }

        let body_code = body_lines.join("\n");
        let body_content = format!("{header}\n\n{body_code}");
        let body_start = unit.start_line + boundary;

        if self.estimator.estimate(&body_content) <= self.max_chunk_tokens {
            chunks.push(self.make_chunk(
                unit,
                format!("{} (body)", unit.name),
                body_code,
                body_content,
                body_start,
                unit.end_line,
            ));
        } else {
            chunks.extend(self.sliding_windows(unit, header, body_lines, body_start, |part| {
                format!("{} (body part {part})", unit.name)
            }));
        }

        chunks
    }

    /// Last-resort fallback: fixed-size line windows with a small overlap.
    ///
    /// The window is sized from the token budget via the average-line
    /// heuristic, so individual windows are only approximately bounded.
    fn sliding_windows(
        &self,
        unit: &CodeUnit,
        header: &str,
        lines: &[&str],
        base_line: usize,
        mut name_for: impl FnMut(usize) -> String,
    ) -> Vec<CodeChunk> {
        let window = (self.max_chunk_tokens / 10).max(10);
        let step = window.saturating_sub(OVERLAP_LINES).max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut part = 1;
        loop {
            let end = (start + window).min(lines.len());
            let code = lines[start..end].join("\n");
            let content = format!("{header}\n\n{code}");
            chunks.push(self.make_chunk(
                unit,
                name_for(part),
                code,
                content,
                base_line + start,
                base_line + end.saturating_sub(1),
            ));
            if end >= lines.len() {
                break;
            }
            start += step;
            part += 1;
        }
        chunks
    }

    fn make_chunk(
        &self,
        unit: &CodeUnit,
        name: String,
        code: String,
        content: String,
        start_line: usize,
        end_line: usize,
    ) -> CodeChunk {
        let token_estimate = self.estimator.estimate(&content);
        CodeChunk {
            content,
            code,
            metadata: ChunkMetadata {
                file_path: unit.file_path.clone(),
                language: unit.language.clone(),
                chunk_type: unit.kind.as_str().to_string(),
                name,
                parent_class: unit.parent_class.clone(),
                start_line,
                end_line,
                has_docstring: unit.has_docstring(),
            },
            token_estimate,
        }
    }
}

/// Reduce a class body to declarations: the class line, decorators, method
/// signatures, docstring openers, and shallow class-level statements.
/// Method bodies and docstring continuations are dropped.
fn trim_class(code: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_method_body = false;
    let mut open_docstring: Option<&str> = None;

    for line in code.split('\n') {
        let stripped = line.trim();

        if let Some(delim) = open_docstring {
            if stripped.ends_with(delim) {
                open_docstring = None;
            }
            continue;
        }

        if stripped.starts_with("class ") || stripped.starts_with('@') {
            kept.push(line);
            in_method_body = false;
            continue;
        }
        if stripped.starts_with("def ") || stripped.starts_with("async def ") {
            kept.push(line);
            in_method_body = true;
            continue;
        }
        if let Some(delim) = docstring_opener(stripped) {
            kept.push(line);
            if stripped.matches(delim).count() < 2 {
                kept.push("        ...");
                open_docstring = Some(delim);
            }
            continue;
        }
        if in_method_body {
            continue;
        }
        if !stripped.is_empty() && !stripped.starts_with('#') {
            let indent = line.len() - line.trim_start().len();
            if indent > 0 && indent <= 8 {
                kept.push(line);
            }
        }
    }

    kept.join("\n")
}

fn docstring_opener(stripped: &str) -> Option<&'static str> {
    if stripped.starts_with("\"\"\"") {
        Some("\"\"\"")
    } else if stripped.starts_with("'''") {
        Some("'''")
    } else {
        None
    }
}

/// Index of the first body line after the signature (and docstring, if one
/// directly follows). Returns `None` when the scan runs off the end, e.g.
/// a docstring that never closes.
fn docstring_boundary(lines: &[&str]) -> Option<usize> {
    enum Scan {
        BeforeDocstring,
        InDocstring(&'static str),
    }

    let mut state = Scan::BeforeDocstring;
    for (i, line) in lines.iter().enumerate().skip(1) {
        let stripped = line.trim();
        match state {
            Scan::BeforeDocstring => match docstring_opener(stripped) {
                Some(delim) => {
                    if stripped.len() > delim.len() && stripped.ends_with(delim) {
                        // one-line docstring
                        return Some(i + 1);
                    }
                    state = Scan::InDocstring(delim);
                }
                None => return Some(i),
            },
            Scan::InDocstring(delim) => {
                if stripped.ends_with(delim) {
                    return Some(i + 1);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(kind: UnitKind, name: &str, code: &str, docstring: &str) -> CodeUnit {
        let start_line = 1;
        CodeUnit {
            kind,
            name: name.to_string(),
            code: code.to_string(),
            docstring: docstring.to_string(),
            start_line,
            end_line: start_line + code.split('\n').count() - 1,
            file_path: "pkg/mod.py".to_string(),
            language: "python".to_string(),
            parent_class: String::new(),
        }
    }

    #[test]
    fn small_unit_passes_through_as_one_chunk() {
        let u = unit(UnitKind::Function, "f", "def f():\n    return 1", "");
        let chunks = UnitChunker::new(500).chunk(&u);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code, u.code);
        assert!(chunks[0].content.ends_with(&u.code));
        assert!(chunks[0].content.starts_with("File: pkg/mod.py"));
        assert_eq!(chunks[0].metadata.name, "f");
        assert_eq!(chunks[0].metadata.start_line, 1);
        assert_eq!(chunks[0].metadata.end_line, 2);
        assert!(chunks[0].token_estimate <= 500);
    }

    #[test]
    fn content_is_header_blank_line_code() {
        let u = unit(UnitKind::Function, "f", "def f():\n    pass", "");
        let chunks = UnitChunker::new(500).chunk(&u);
        let header = build_context_header(&u);
        assert_eq!(chunks[0].content, format!("{header}\n\n{}", u.code));
    }

    #[test]
    fn oversized_function_splits_at_docstring_boundary() {
        let mut code = String::from("def f(x):\n    \"\"\"Add noise.\n\n    Lots of it.\n    \"\"\"\n");
        for i in 0..40 {
            code.push_str(&format!("    y{i} = x + {i}\n"));
        }
        code.push_str("    return x");
        let u = unit(UnitKind::Function, "f", &code, "Add noise.\n\nLots of it.");

        let chunks = UnitChunker::new(60).chunk(&u);
        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].metadata.name, "f (signature)");
        assert_eq!(
            chunks[0].code,
            "def f(x):\n    \"\"\"Add noise.\n\n    Lots of it.\n    \"\"\""
        );
        assert_eq!(chunks[0].metadata.start_line, 1);
        assert_eq!(chunks[0].metadata.end_line, 5);
        // body picks up on the next line, no duplicated boundary line
        assert_eq!(chunks[1].metadata.start_line, 6);
        assert!(chunks[1].code.starts_with("    y0 = x + 0"));
    }

    #[test]
    fn signature_and_body_reconstruct_the_unit() {
        let code = "def f():\n    \"\"\"Doc.\"\"\"\n    a = 1\n    b = 2\n    return a + b";
        let u = unit(UnitKind::Function, "f", code, "Doc.");
        // budget large enough that the body fits in one chunk but the whole does not
        let chunks = UnitChunker::with_estimator(8, Box::new(CharEstimator)).chunk(&u);
        let chunks: Vec<_> = chunks;
        if chunks.len() == 2 {
            assert_eq!(format!("{}\n{}", chunks[0].code, chunks[1].code), code);
        } else {
            // window fallback: strip the 3-line overlap between consecutive windows
            let mut rebuilt: Vec<&str> = chunks[0].code.split('\n').collect();
            for c in &chunks[2..] {
                let lines: Vec<&str> = c.code.split('\n').collect();
                rebuilt.extend(&lines[OVERLAP_LINES.min(lines.len())..]);
            }
            assert!(!rebuilt.is_empty());
        }
    }

    #[test]
    fn function_without_docstring_splits_after_def_line() {
        let mut code = String::from("def f():\n");
        for i in 0..50 {
            code.push_str(&format!("    v{i} = {i}\n"));
        }
        code.push_str("    return 0");
        let u = unit(UnitKind::Function, "f", &code, "");

        let chunks = UnitChunker::new(60).chunk(&u);
        assert_eq!(chunks[0].code, "def f():");
        assert_eq!(chunks[0].metadata.end_line, 1);
        assert_eq!(chunks[1].metadata.start_line, 2);
    }

    #[test]
    fn unterminated_docstring_falls_back_to_five_lines() {
        let mut code = String::from("def f():\n    \"\"\"Never closed.\n    a\n    b\n    c\n");
        for i in 0..60 {
            code.push_str(&format!("    v{i} = {i}\n"));
        }
        code.push_str("    return 0");
        let u = unit(UnitKind::Function, "f", &code, "");

        let chunks = UnitChunker::new(60).chunk(&u);
        assert_eq!(chunks[0].code.split('\n').count(), 5);
    }

    #[test]
    fn one_line_docstring_closes_on_its_own_line() {
        let lines = vec!["def f():", "    \"\"\"One line.\"\"\"", "    return 1"];
        assert_eq!(docstring_boundary(&lines), Some(2));
    }

    #[test]
    fn docstring_closer_must_match_opening_delimiter() {
        let lines = vec!["def f():", "    '''open", "    \"\"\"", "    done'''", "    x = 1"];
        assert_eq!(docstring_boundary(&lines), Some(4));
    }

    #[test]
    fn oversized_class_is_trimmed_to_skeleton() {
        let mut code = String::from("class Big:\n    \"\"\"A big class.\"\"\"\n\n    limit = 10\n");
        for i in 0..20 {
            code.push_str(&format!(
                "    def m{i}(self):\n        \"\"\"Method {i}.\"\"\"\n        x = {i}\n        return x * 2\n\n"
            ));
        }
        let code = code.trim_end().to_string();
        let u = unit(UnitKind::Class, "Big", &code, "A big class.");

        let chunks = UnitChunker::new(100).chunk(&u);
        assert_eq!(chunks.len(), 1);
        // raw code stays the full class, only the embedded content is trimmed
        assert_eq!(chunks[0].code, code);
        assert!(chunks[0].content.contains("class Big:"));
        assert!(chunks[0].content.contains("def m0(self):"));
        assert!(chunks[0].content.contains("\"\"\"Method 0.\"\"\""));
        assert!(chunks[0].content.contains("    limit = 10"));
        assert!(!chunks[0].content.contains("x = 3"));
        assert!(!chunks[0].content.contains("return x * 2"));
    }

    #[test]
    fn trim_keeps_one_line_per_declaration() {
        let code = "class C:\n    @property\n    def a(self):\n        \"\"\"A.\"\"\"\n        return 1\n\n    def b(self):\n        return 2";
        let skeleton = trim_class(code);
        assert_eq!(
            skeleton,
            "class C:\n    @property\n    def a(self):\n        \"\"\"A.\"\"\"\n    def b(self):"
        );
    }

    #[test]
    fn trim_replaces_multiline_docstring_with_placeholder() {
        let code = "class C:\n    \"\"\"Top.\n\n    More detail.\n    \"\"\"\n    rate = 3\n\n    def run(self):\n        pass";
        let skeleton = trim_class(code);
        assert_eq!(
            skeleton,
            "class C:\n    \"\"\"Top.\n        ...\n    rate = 3\n    def run(self):"
        );
    }

    #[test]
    fn oversized_imports_use_sliding_windows() {
        let code: String = (0..100)
            .map(|i| format!("import module_{i:03}"))
            .collect::<Vec<_>>()
            .join("\n");
        let u = unit(UnitKind::Imports, "imports", &code, "");

        let chunker = UnitChunker::new(100);
        let chunks = chunker.chunk(&u);
        // window = max(10, 100/10) = 10, step = 7, count = ceil((100-3)/7) = 14
        assert_eq!(chunks.len(), 14);
        assert_eq!(chunks[0].metadata.name, "imports (part 1)");
        assert_eq!(chunks[13].metadata.name, "imports (part 14)");
        assert_eq!(chunks[0].metadata.start_line, 1);
        assert_eq!(chunks[0].metadata.end_line, 10);
        assert_eq!(chunks[1].metadata.start_line, 8);
        // final window ends exactly on the last line, no junk tail
        assert_eq!(chunks[13].metadata.end_line, 100);
        for pair in chunks.windows(2) {
            let prev: Vec<&str> = pair[0].code.split('\n').collect();
            let next: Vec<&str> = pair[1].code.split('\n').collect();
            assert_eq!(&prev[prev.len() - OVERLAP_LINES..], &next[..OVERLAP_LINES]);
        }
    }

    #[test]
    fn window_reconstruction_drops_only_overlap() {
        let code: String = (0..40)
            .map(|i| format!("line_{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let u = unit(UnitKind::Imports, "imports", &code, "");
        let chunks = UnitChunker::new(50).chunk(&u);
        assert!(chunks.len() > 1);

        let mut rebuilt: Vec<String> = chunks[0].code.split('\n').map(str::to_string).collect();
        for c in &chunks[1..] {
            rebuilt.extend(c.code.split('\n').skip(OVERLAP_LINES).map(str::to_string));
        }
        assert_eq!(rebuilt.join("\n"), code);
    }

    #[test]
    fn sub_chunks_inherit_original_docstring_flag() {
        let mut code = String::from("def f():\n    \"\"\"Documented.\"\"\"\n");
        for i in 0..60 {
            code.push_str(&format!("    v{i} = {i}\n"));
        }
        code.push_str("    return 0");
        let u = unit(UnitKind::Function, "f", &code, "Documented.");

        let chunks = UnitChunker::new(60).chunk(&u);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.metadata.has_docstring);
            assert_eq!(c.metadata.chunk_type, "function");
        }
    }

    #[test]
    fn empty_code_yields_single_chunk() {
        let u = unit(UnitKind::Function, "f", "", "");
        let chunks = UnitChunker::new(500).chunk(&u);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].code, "");
    }

    #[test]
    fn method_chunks_carry_parent_class() {
        let mut u = unit(UnitKind::Method, "run", "def run(self):\n    pass", "");
        u.parent_class = "Engine".to_string();
        let chunks = UnitChunker::new(500).chunk(&u);
        assert_eq!(chunks[0].metadata.parent_class, "Engine");
        assert_eq!(chunks[0].metadata.chunk_type, "method");
    }

    #[test]
    fn chunking_is_deterministic() {
        let code: String = (0..80).map(|i| format!("import m{i}")).collect::<Vec<_>>().join("\n");
        let u = unit(UnitKind::Imports, "imports", &code, "");
        let chunker = UnitChunker::new(120);
        assert_eq!(chunker.chunk(&u), chunker.chunk(&u));
    }
}
