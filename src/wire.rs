use crate::constants::{COMMIT_PREFIX, FILE_PREFIX};
use std::collections::HashMap;

/// one file's path and its content as lines (without line terminators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    pub lines: Vec<String>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// split text read from disk into a record
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        Self::new(path, text.lines().map(str::to_string).collect())
    }

    /// content as written to disk: lines joined by newlines, newline terminated
    pub fn text(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn word_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }
}

/// the decoded contents of a buffer
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Bundle {
    pub files: Vec<FileRecord>,
    pub commit_message: Option<String>,
    /// non-blank lines seen before any `File:` header
    pub dropped_lines: usize,
    /// `File:` headers that re-declared an earlier path
    pub redeclared: usize,
}

impl Bundle {
    pub fn total_words(&self) -> usize {
        self.files.iter().map(FileRecord::word_count).sum()
    }
}

/// parse a buffer into file records
///
/// a later header for an already seen path replaces that record's content but
/// keeps its position. each section loses exactly one trailing empty line when
/// it closes, that line being the separator written by `write_record`.
pub fn parse(buffer: &str) -> Bundle {
    let mut bundle = Bundle::default();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;

    for line in buffer.lines() {
        if let Some(path) = line.strip_prefix(FILE_PREFIX) {
            if let Some(idx) = current {
                close_section(&mut bundle.files[idx]);
            }
            let idx = if let Some(&idx) = positions.get(path) {
                bundle.files[idx].lines.clear();
                bundle.redeclared += 1;
                idx
            } else {
                positions.insert(path.to_string(), bundle.files.len());
                bundle.files.push(FileRecord::new(path, Vec::new()));
                bundle.files.len() - 1
            };
            current = Some(idx);
        } else if let Some(idx) = current {
            bundle.files[idx].lines.push(line.to_string());
        } else if let Some(message) = line.strip_prefix(COMMIT_PREFIX) {
            // an empty directive leaves the message unset
            let message = message.trim();
            if bundle.commit_message.is_some() {
                bundle.dropped_lines += 1;
            } else if !message.is_empty() {
                bundle.commit_message = Some(message.to_string());
            }
        } else if !line.trim().is_empty() {
            bundle.dropped_lines += 1;
        }
    }

    if let Some(idx) = current {
        close_section(&mut bundle.files[idx]);
    }

    bundle
}

/// treat the whole buffer as the content of `target`
pub fn parse_single(buffer: &str, target: &str) -> Bundle {
    Bundle {
        files: vec![FileRecord::from_text(target, buffer)],
        ..Bundle::default()
    }
}

fn close_section(record: &mut FileRecord) {
    if record.lines.last().is_some_and(String::is_empty) {
        record.lines.pop();
    }
}

/// append one record to a buffer: header, content, separator
pub fn write_record(out: &mut String, path: &str, content: &str) {
    out.push_str(FILE_PREFIX);
    out.push_str(path);
    out.push('\n');
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
}

/// whether content contains a line the parser would take as a header
pub fn has_header_collision(content: &str) -> bool {
    content.lines().any(|line| line.starts_with(FILE_PREFIX))
}
