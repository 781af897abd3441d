use std::path::{Path, PathBuf};

/// paths chosen for commit during one decode run
#[derive(Debug, Default)]
pub struct CommitSet {
    paths: Vec<PathBuf>,
}

impl CommitSet {
    pub fn insert(&mut self, path: &Path) {
        if !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.to_path_buf());
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// hand the paths to the final commit, leaving the set empty
    pub fn take(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}
