use crate::decision::Operator;
use crate::git::Vcs;
use anyhow::{Result, bail};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// operator answering from a script
#[derive(Default)]
pub struct ScriptedOperator {
    pub choices: VecDeque<String>,
    pub acknowledge: bool,
    pub message: Option<String>,
    pub asked: Vec<String>,
    pub rejected: Vec<String>,
    pub acknowledged: Vec<String>,
    pub message_requests: usize,
}

impl ScriptedOperator {
    pub fn new(choices: &[&str]) -> Self {
        Self {
            choices: choices.iter().map(|c| (*c).to_string()).collect(),
            acknowledge: true,
            ..Self::default()
        }
    }
}

impl Operator for ScriptedOperator {
    fn choose(&mut self, path: &str) -> Result<String> {
        self.asked.push(path.to_string());
        match self.choices.pop_front() {
            Some(choice) => Ok(choice),
            None => bail!("script ran out of choices at {path}"),
        }
    }

    fn rejected(&mut self, input: &str) {
        self.rejected.push(input.to_string());
    }

    fn acknowledge_untracked(&mut self, path: &str) -> Result<bool> {
        self.acknowledged.push(path.to_string());
        Ok(self.acknowledge)
    }

    fn commit_message(&mut self) -> Result<String> {
        self.message_requests += 1;
        match &self.message {
            Some(message) => Ok(message.clone()),
            None => bail!("no commit message scripted"),
        }
    }
}

/// vcs double recording every call
#[derive(Default)]
pub struct RecordingVcs {
    pub tracked: Vec<PathBuf>,
    pub staged: Vec<PathBuf>,
    pub commits: Vec<(String, Vec<PathBuf>)>,
    pub fail_stage: bool,
    pub fail_commit: bool,
}

impl Vcs for RecordingVcs {
    fn is_tracked(&self, path: &Path) -> Result<bool> {
        Ok(self.tracked.iter().any(|p| p == path))
    }

    fn stage(&mut self, path: &Path) -> Result<()> {
        if self.fail_stage {
            bail!("failed to stage {}", path.display());
        }
        self.staged.push(path.to_path_buf());
        Ok(())
    }

    fn commit(&mut self, message: &str, paths: &[PathBuf]) -> Result<()> {
        if self.fail_commit {
            bail!("git commit failed with exit code: 1");
        }
        self.commits.push((message.to_string(), paths.to_vec()));
        Ok(())
    }
}
