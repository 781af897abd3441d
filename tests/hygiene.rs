use std::fs;
use std::path::{Path, PathBuf};

const COMMENT_MARKERS: [&str; 3] = ["TODO", "FIXME", "XXX"];

#[derive(Debug)]
struct Finding {
    file: PathBuf,
    line_num: usize,
    line: String,
}

#[test]
fn no_leftover_markers_or_debug_macros() {
    let mut findings = Vec::new();
    for path in rust_sources(Path::new("src")) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            if has_comment_marker(line) || has_debug_macro(line) {
                findings.push(Finding {
                    file: path.clone(),
                    line_num: idx + 1,
                    line: line.trim().to_string(),
                });
            }
        }
    }

    if !findings.is_empty() {
        eprintln!("\nfound {} leftover line(s):", findings.len());
        for finding in &findings {
            eprintln!(
                "  {}:{}: {}",
                finding.file.display(),
                finding.line_num,
                finding.line
            );
        }
        panic!("leftover markers and dbg! calls must be removed");
    }
}

fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            found.extend(rust_sources(&path));
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            found.push(path);
        }
    }
    found.sort();
    found
}

/// the text of a `//` or `/*` comment on this line, if any
fn comment_part(line: &str) -> Option<&str> {
    let start = [line.find("//"), line.find("/*")]
        .into_iter()
        .flatten()
        .min()?;
    Some(&line[start..])
}

fn has_comment_marker(line: &str) -> bool {
    let comment = match comment_part(line) {
        Some(comment) => comment,
        // continuation of a block comment
        None if line.trim_start().starts_with('*') => line,
        None => return false,
    };
    let upper = comment.to_uppercase();
    COMMENT_MARKERS.iter().any(|marker| upper.contains(marker))
}

fn has_debug_macro(line: &str) -> bool {
    let code = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.contains("dbg!(")
}

#[test]
fn test_marker_detection() {
    assert!(has_comment_marker("let x = 1; // todo: remove"));
    assert!(has_comment_marker("/* FIXME */"));
    assert!(has_comment_marker("     * XXX continuation"));
    assert!(!has_comment_marker("let todo_list = Vec::new();"));
    assert!(!has_comment_marker("// plain comment"));
}

#[test]
fn test_debug_macro_detection() {
    assert!(has_debug_macro("    dbg!(&bundle);"));
    assert!(!has_debug_macro("    // dbg!(&bundle);"));
    assert!(!has_debug_macro("    info!(\"{}\", x);"));
}
