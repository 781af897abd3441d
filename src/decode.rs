use crate::commit_set::CommitSet;
use crate::context::DecodeContext;
use crate::decision::{self, Operator, Outcome};
use crate::diff;
use crate::git::Vcs;
use crate::ui::{count, plural};
use crate::wire::{Bundle, FileRecord};
use crate::{info, status, warning};
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// what happened during one decode run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub committed: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub failed: usize,
    /// words in all decoded file content
    pub total_words: usize,
    /// whether the aggregated git commit was made
    pub commit_made: bool,
}

impl Summary {
    pub fn skipped_or_overwritten(&self) -> usize {
        self.overwritten + self.skipped + self.failed
    }

    pub fn print(&self) {
        info!();
        status!("summary:");
        info!(
            "- {} {} committed to git",
            self.committed,
            plural(self.committed, "file")
        );
        info!(
            "- {} {} skipped or overwritten without git",
            self.skipped_or_overwritten(),
            plural(self.skipped_or_overwritten(), "file")
        );
        if self.failed > 0 {
            info!(
                "- {} {} could not be written",
                self.failed,
                plural(self.failed, "file")
            );
        }
        info!("- total words in the original buffer: {}", count(self.total_words));
    }
}

/// apply every record in the bundle, then commit the files chosen for commit
pub fn decode(
    ctx: &DecodeContext,
    bundle: &Bundle,
    operator: &mut dyn Operator,
    vcs: &mut dyn Vcs,
) -> Result<Summary> {
    let mut summary = Summary {
        total_words: bundle.total_words(),
        ..Summary::default()
    };
    let mut commit_set = CommitSet::default();

    for record in &bundle.files {
        let target = ctx.target(&record.path);

        if ctx.show_diff {
            show_diff(ctx, record, &target);
        }

        match decision::resolve(record, &target, operator, vcs, &mut commit_set)? {
            Outcome::Committed => summary.committed += 1,
            Outcome::Overwritten => summary.overwritten += 1,
            Outcome::Skipped => summary.skipped += 1,
            Outcome::Failed => summary.failed += 1,
        }
    }

    summary.commit_made = commit(
        bundle.commit_message.as_deref(),
        &mut commit_set,
        operator,
        vcs,
    );

    Ok(summary)
}

fn show_diff(ctx: &DecodeContext, record: &FileRecord, target: &Path) {
    let existing = match fs::read_to_string(target) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warning!("failed to read {}: {}", target.display(), e);
            None
        }
    };

    info!();
    diff::diff(&record.path, existing.as_deref(), record, ctx.context_lines).print();
}

/// one commit over every staged path; failures are reported, never retried
fn commit(
    buffer_message: Option<&str>,
    commit_set: &mut CommitSet,
    operator: &mut dyn Operator,
    vcs: &mut dyn Vcs,
) -> bool {
    if commit_set.is_empty() {
        return false;
    }

    let message = match buffer_message.filter(|m| !m.trim().is_empty()) {
        Some(message) => message.to_string(),
        None => match operator.commit_message() {
            Ok(message) => message,
            Err(e) => {
                warning!("{:#}; files are staged but not committed", e);
                return false;
            }
        },
    };
    let message = message.trim();
    if message.is_empty() {
        warning!("empty commit message; files are staged but not committed");
        return false;
    }

    let paths = commit_set.take();
    status!(
        "committing {} {}: {}",
        paths.len(),
        plural(paths.len(), "file"),
        message
    );
    match vcs.commit(message, &paths) {
        Ok(()) => true,
        Err(e) => {
            warning!("{:#}", e);
            false
        }
    }
}
