use crate::commit_set::CommitSet;
use crate::git::Vcs;
use crate::wire::FileRecord;
use crate::{error, warning};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// what to do with one decoded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Commit,
    Overwrite,
    Skip,
}

impl FromStr for Decision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "commit" => Ok(Self::Commit),
            "o" | "overwrite" => Ok(Self::Overwrite),
            "s" | "skip" => Ok(Self::Skip),
            _ => Err(anyhow!("invalid choice {s:?}, enter 'c', 'o', or 's'")),
        }
    }
}

/// how a file's decision ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    Overwritten,
    Skipped,
    /// the new content could not be written
    Failed,
}

/// where a file is in its decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Prompting,
    Done(Outcome),
}

/// source of the operator's answers
pub trait Operator {
    /// raw answer to "commit/overwrite/skip" for a path
    fn choose(&mut self, path: &str) -> Result<String>;

    /// called after an answer that is not a valid decision
    fn rejected(&mut self, input: &str);

    /// the path exists but git does not track it; true once the operator has
    /// stabilized the current content and wants to proceed
    fn acknowledge_untracked(&mut self, path: &str) -> Result<bool>;

    /// message for the aggregated commit when the buffer carried none
    fn commit_message(&mut self) -> Result<String>;
}

/// drives one record from `Prompting` to a terminal state
pub struct FileMachine<'a> {
    record: &'a FileRecord,
    target: &'a Path,
    state: FileState,
}

impl<'a> FileMachine<'a> {
    pub fn new(record: &'a FileRecord, target: &'a Path) -> Self {
        Self {
            record,
            target,
            state: FileState::Prompting,
        }
    }

    /// consume one operator input; invalid input leaves the machine prompting
    pub fn step(
        &mut self,
        input: &str,
        operator: &mut dyn Operator,
        vcs: &mut dyn Vcs,
        commit_set: &mut CommitSet,
    ) -> Result<FileState> {
        if let FileState::Done(_) = self.state {
            return Ok(self.state);
        }

        let decision = match input.parse::<Decision>() {
            Ok(decision) => decision,
            Err(_) => {
                operator.rejected(input);
                return Ok(self.state);
            }
        };

        let outcome = match decision {
            Decision::Skip => Outcome::Skipped,
            Decision::Overwrite => match self.write() {
                Ok(()) => Outcome::Overwritten,
                Err(e) => self.failed(&e),
            },
            Decision::Commit => self.commit(operator, vcs, commit_set)?,
        };
        self.state = FileState::Done(outcome);
        Ok(self.state)
    }

    fn commit(
        &self,
        operator: &mut dyn Operator,
        vcs: &mut dyn Vcs,
        commit_set: &mut CommitSet,
    ) -> Result<Outcome> {
        if self.target.exists() {
            // an unknown tracking status is treated as untracked
            let tracked = vcs.is_tracked(self.target).unwrap_or_else(|e| {
                warning!("{:#}", e);
                false
            });
            if !tracked && !operator.acknowledge_untracked(&self.record.path)? {
                warning!("skipping {}: current content is not committed", self.record.path);
                return Ok(Outcome::Skipped);
            }
        }

        if let Err(e) = self.write() {
            return Ok(self.failed(&e));
        }

        match vcs.stage(self.target) {
            Ok(()) => {
                commit_set.insert(self.target);
                Ok(Outcome::Committed)
            }
            Err(e) => {
                warning!("{} (written without staging)", e);
                Ok(Outcome::Overwritten)
            }
        }
    }

    fn failed(&self, e: &anyhow::Error) -> Outcome {
        error!("{:#}", e);
        Outcome::Failed
    }

    fn write(&self) -> Result<()> {
        write_atomic(self.target, &self.record.text())
    }
}

/// run the machine until the operator gives a valid decision
pub fn resolve(
    record: &FileRecord,
    target: &Path,
    operator: &mut dyn Operator,
    vcs: &mut dyn Vcs,
    commit_set: &mut CommitSet,
) -> Result<Outcome> {
    let mut machine = FileMachine::new(record, target);
    loop {
        let input = operator.choose(&record.path)?;
        if let FileState::Done(outcome) = machine.step(&input, operator, vcs, commit_set)? {
            return Ok(outcome);
        }
    }
}

/// replace `path` with `content` via a temporary file in the same directory
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file for {}", path.display()))?;

    // temp files are created owner-only; keep the target's mode instead
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("failed to set permissions for {}", path.display()))?;
    }

    tmp.write_all(content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
