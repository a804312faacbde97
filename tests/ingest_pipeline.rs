//! End-to-end test of discovery, parsing, and chunking on a small repo

use std::fs;

use codelens::chunk::{CharEstimator, TokenEstimator};
use codelens::ingest::parse_and_chunk;
use codelens::parse::FileWalker;

const MAIN_PY: &str = r#""""Order processing service."""
import json
import logging

from decimal import Decimal


def parse_order(raw):
    """Parse a raw order payload."""
    data = json.loads(raw)
    return data


class OrderBook:
    """Holds open orders."""

    limit = 100

    def add(self, order):
        """Add an order."""
        self.orders.append(order)

    def clear(self):
        self.orders = []
"#;

const HELPERS_PY: &str = "def double(x):\n    return x * 2\n";

fn make_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.py"), MAIN_PY).unwrap();
    fs::create_dir(dir.path().join("util")).unwrap();
    fs::write(dir.path().join("util/helpers.py"), HELPERS_PY).unwrap();
    fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();
    dir
}

#[test]
fn full_pipeline_produces_ordered_grounded_chunks() {
    let repo = make_repo();
    let files = FileWalker::new(Vec::new()).discover(repo.path()).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
    assert_eq!(paths, vec!["main.py", "notes.md", "util/helpers.py"]);

    let (chunks, report) = parse_and_chunk(&files, repo.path(), 500);
    assert_eq!(report.files_parsed, 2);
    assert_eq!(report.files_unsupported, 1);
    assert_eq!(report.files_skipped, 0);

    // main.py units: module docstring, imports, parse_order, OrderBook, add, clear
    assert_eq!(report.units, 6 + 1);

    let main_chunks: Vec<_> = chunks
        .iter()
        .filter(|c| c.metadata.file_path == "main.py")
        .collect();
    let names: Vec<&str> = main_chunks.iter().map(|c| c.metadata.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["module_docstring", "imports", "parse_order", "OrderBook", "add", "clear", "main.py"]
    );

    // chunks for main.py come before chunks for util/helpers.py
    let first_helper = chunks
        .iter()
        .position(|c| c.metadata.file_path == "util/helpers.py")
        .unwrap();
    assert!(chunks[..first_helper]
        .iter()
        .all(|c| c.metadata.file_path == "main.py"));
}

#[test]
fn import_groups_coalesce_across_blank_lines_only_when_unbroken() {
    let repo = make_repo();
    let files = FileWalker::new(Vec::new()).discover(repo.path()).unwrap();
    let (chunks, _) = parse_and_chunk(&files, repo.path(), 500);

    let imports = chunks
        .iter()
        .find(|c| c.metadata.file_path == "main.py" && c.metadata.chunk_type == "imports")
        .unwrap();
    assert_eq!(
        imports.code,
        "import json\nimport logging\nfrom decimal import Decimal"
    );
    assert_eq!(imports.metadata.start_line, 2);
    assert_eq!(imports.metadata.end_line, 5);
}

#[test]
fn chunk_provenance_matches_source_lines() {
    let repo = make_repo();
    let files = FileWalker::new(Vec::new()).discover(repo.path()).unwrap();
    let (chunks, _) = parse_and_chunk(&files, repo.path(), 500);

    // imports coalesce statements and drop blank lines, so exact line
    // reconstruction applies to the other unit kinds
    let source_lines: Vec<&str> = MAIN_PY.split('\n').collect();
    for chunk in chunks.iter().filter(|c| {
        c.metadata.file_path == "main.py"
            && c.metadata.chunk_type != "file_summary"
            && c.metadata.chunk_type != "imports"
    }) {
        let expected = source_lines
            [chunk.metadata.start_line - 1..chunk.metadata.end_line]
            .join("\n");
        assert_eq!(chunk.code, expected, "chunk {}", chunk.metadata.name);
    }
}

#[test]
fn methods_carry_their_class_and_docstring_flag() {
    let repo = make_repo();
    let files = FileWalker::new(Vec::new()).discover(repo.path()).unwrap();
    let (chunks, _) = parse_and_chunk(&files, repo.path(), 500);

    let add = chunks
        .iter()
        .find(|c| c.metadata.name == "add")
        .unwrap();
    assert_eq!(add.metadata.chunk_type, "method");
    assert_eq!(add.metadata.parent_class, "OrderBook");
    assert!(add.metadata.has_docstring);

    let clear = chunks
        .iter()
        .find(|c| c.metadata.name == "clear")
        .unwrap();
    assert!(!clear.metadata.has_docstring);
}

#[test]
fn every_chunk_within_budget_unless_trimmed_class() {
    let repo = make_repo();
    let files = FileWalker::new(Vec::new()).discover(repo.path()).unwrap();
    let max = 500;
    let (chunks, _) = parse_and_chunk(&files, repo.path(), max);

    let est = CharEstimator;
    for chunk in &chunks {
        assert_eq!(chunk.token_estimate, est.estimate(&chunk.content));
        assert!(chunk.token_estimate <= max, "oversized chunk {}", chunk.metadata.name);
    }
}
