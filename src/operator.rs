use crate::decision::{Decision, Operator};
use crate::{ui, warning};
use anyhow::{Result, bail};

/// asks the person at the terminal
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn choose(&mut self, path: &str) -> Result<String> {
        ui::prompt(&format!("File: {path}\n"), &["commit", "overwrite", "skip"])
    }

    fn rejected(&mut self, input: &str) {
        if input.is_empty() {
            warning!("invalid choice, enter 'c', 'o', or 's'");
        } else {
            warning!("invalid choice '{}', enter 'c', 'o', or 's'", input);
        }
    }

    fn acknowledge_untracked(&mut self, path: &str) -> Result<bool> {
        ui::wait_for_enter(&format!(
            "{path} is not committed in git. commit its current contents, then press enter (n to skip):"
        ))
    }

    fn commit_message(&mut self) -> Result<String> {
        ui::edit_one_line("commit message? ", "")
    }
}

/// gives the same answer for every file, for scripted runs
pub struct FixedOperator {
    decision: Decision,
}

impl FixedOperator {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }
}

impl Operator for FixedOperator {
    fn choose(&mut self, _path: &str) -> Result<String> {
        Ok(match self.decision {
            Decision::Commit => "c",
            Decision::Overwrite => "o",
            Decision::Skip => "s",
        }
        .to_string())
    }

    fn rejected(&mut self, input: &str) {
        warning!("invalid choice '{}'", input);
    }

    /// nobody is present to stabilize the file, so never proceed
    fn acknowledge_untracked(&mut self, path: &str) -> Result<bool> {
        warning!("{} is not committed in git; run interactively to replace it", path);
        Ok(false)
    }

    fn commit_message(&mut self) -> Result<String> {
        bail!("no commit message: pass --message or add a Commit: line")
    }
}
