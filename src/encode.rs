use crate::filter::{CandidateFiles, display_path};
use crate::wire;
use std::fs;

/// a candidate file that could not be read as text
#[derive(Debug)]
pub struct ReadFailure {
    pub path: String,
    pub reason: String,
}

/// result of serializing a directory
#[derive(Debug, Default)]
pub struct Encoded {
    pub buffer: String,
    /// paths written to the buffer, in walk order
    pub manifest: Vec<String>,
    pub total_words: usize,
    pub failures: Vec<ReadFailure>,
    /// files containing a `File:` line, which will not decode back intact
    pub collisions: Vec<String>,
}

/// serialize every candidate file into one buffer
///
/// unreadable files are recorded and skipped; the walk always completes.
/// `on_file` is called with each path before it is read.
pub fn encode(files: &CandidateFiles, mut on_file: impl FnMut(&str)) -> Encoded {
    let mut encoded = Encoded::default();

    for path in files.iter() {
        let shown = display_path(&path);
        on_file(&shown);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                encoded.failures.push(ReadFailure {
                    path: shown,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if wire::has_header_collision(&content) {
            encoded.collisions.push(shown.clone());
        }

        encoded.total_words += content.split_whitespace().count();
        wire::write_record(&mut encoded.buffer, &shown, &content);
        encoded.manifest.push(shown);
    }

    encoded
}
