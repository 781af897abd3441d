use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// settings for one decode run, passed in rather than read from the process
pub struct DecodeContext {
    /// directory that relative paths in the buffer are resolved against
    pub root: PathBuf,

    /// unchanged lines shown around each diff hunk
    pub context_lines: usize,

    /// print diffs before each prompt
    pub show_diff: bool,
}

impl DecodeContext {
    pub fn new(root: &Path, context_lines: usize) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", root.display()))?;
        Ok(Self {
            root,
            context_lines,
            show_diff: true,
        })
    }

    /// where a buffer path lands on disk; absolute paths are used as-is
    pub fn target(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DecodeContext::new(dir.path(), 3).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(ctx.target("src/a.py"), root.join("src/a.py"));
        #[cfg(unix)]
        assert_eq!(ctx.target("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DecodeContext::new(&dir.path().join("missing"), 3).is_err());
    }
}
