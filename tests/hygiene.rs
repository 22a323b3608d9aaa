//! Hygiene: source scans for antipatterns in the viewer crate.
//!
//! Each pattern has a budget (zero for all of them). Non-test code must not
//! panic inside a browser event handler, must not swallow errors, must log
//! through the `log` facade, and must not leak listener closures that
//! `dispose()` could no longer remove.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// A forbidden pattern and its budget.
struct Rule {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const RULES: &[Rule] = &[
    Rule { pattern: ".unwrap()", max: 0, why: "panics" },
    Rule { pattern: ".expect(", max: 0, why: "panics" },
    Rule { pattern: "panic!(", max: 0, why: "panics" },
    Rule { pattern: "unreachable!(", max: 0, why: "panics" },
    Rule { pattern: "todo!(", max: 0, why: "unfinished stub" },
    Rule { pattern: "unimplemented!(", max: 0, why: "unfinished stub" },
    Rule { pattern: "let _ =", max: 0, why: "discards a result unseen" },
    Rule { pattern: ".ok()", max: 0, why: "discards an error unseen" },
    Rule { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
    Rule { pattern: ".forget()", max: 0, why: "leaks a closure dispose() cannot remove" },
    Rule { pattern: "console::log", max: 0, why: "bypasses the log facade" },
    Rule { pattern: "println!(", max: 0, why: "bypasses the log facade" },
];

/// Production `.rs` files under `src/`, excluding `*_test.rs`.
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
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn source_tree_is_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the crate root");
}

#[test]
fn antipattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for rule in RULES {
        let found = hits(&files, rule.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > rule.max {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "{} ({}): found {count}, max {}\n{}",
                rule.pattern,
                rule.why,
                rule.max,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn every_module_has_sibling_tests() {
    let files = source_files();
    let untested: Vec<&str> = files
        .iter()
        .filter(|f| {
            let name = Path::new(&f.path).file_stem().map(|s| s.to_string_lossy().to_string());
            let skip = matches!(name.as_deref(), Some("lib" | "consts" | "error" | "web"));
            !skip && !f.content.contains("_test.rs\"]")
        })
        .map(|f| f.path.as_str())
        .collect();
    assert!(untested.is_empty(), "modules without a sibling _test.rs: {untested:?}");
}
