//! Hygiene: source-level checks run as tests.
//!
//! Scans the scene crate's production sources for patterns that can crash the
//! host or silently drop errors. Every budget is zero; placement code is pure
//! geometry and each fallible path returns a value or a typed error.

use std::fs;
use std::path::Path;

/// (pattern, budget, what it means)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics on None/Err"),
    (".expect(", 0, "panics on None/Err"),
    ("panic!(", 0, "explicit panic"),
    ("unreachable!(", 0, "explicit panic"),
    ("todo!(", 0, "unfinished stub"),
    ("unimplemented!(", 0, "unfinished stub"),
    ("let _ =", 0, "discarded result"),
    (".ok()", 0, "error converted to None without inspection"),
    ("#[allow(dead_code)]", 0, "dead code kept alive"),
    ("println!(", 0, "library output bypasses tracing"),
    ("eprintln!(", 0, "library output bypasses tracing"),
    ("dbg!(", 0, "leftover debugging"),
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect()
}

#[test]
fn sources_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the scene crate root");
    assert!(files.iter().all(|f| !f.path.ends_with("_test.rs")));
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for &(pattern, budget, meaning) in BUDGETS {
        let found = hits(&files, pattern);
        let total: usize = found.iter().map(|(_, n)| n).sum();
        if total > budget {
            let detail: Vec<String> = found.iter().map(|(p, n)| format!("    {p}: {n}")).collect();
            failures.push(format!("  `{pattern}` ({meaning}): {total} > {budget}\n{}", detail.join("\n")));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn every_module_has_a_test_file() {
    let files = source_files();
    for f in &files {
        let name = Path::new(&f.path).file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        if name == "lib" || name == "consts" {
            continue;
        }
        let wired = f.content.contains(&format!("#[path = \"{name}_test.rs\"]"));
        assert!(wired, "{} has no sibling {name}_test.rs module", f.path);
    }
}
