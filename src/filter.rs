use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// selects files by file name suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffixes: Vec<String>,
}

impl ExtensionFilter {
    /// suffixes without a leading dot get one, so `py` matches `a.py` but not `happy`
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for suffix in suffixes {
            let suffix = suffix.as_ref().trim();
            if suffix.is_empty() {
                continue;
            }
            let suffix = if suffix.starts_with('.') {
                suffix.to_string()
            } else {
                format!(".{suffix}")
            };
            if !normalized.contains(&suffix) {
                normalized.push(suffix);
            }
        }
        Self {
            suffixes: normalized,
        }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| self.suffixes.iter().any(|s| name.ends_with(s.as_str())))
    }
}

/// the files under a root that the encoder will serialize
///
/// each call to `iter` starts a fresh walk: parents before children, siblings
/// sorted by file name
#[derive(Debug, Clone)]
pub struct CandidateFiles {
    root: PathBuf,
    filter: ExtensionFilter,
    respect_ignore: bool,
}

impl CandidateFiles {
    pub fn new(root: impl AsRef<Path>, filter: ExtensionFilter) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            filter,
            respect_ignore: false,
        }
    }

    /// honour .gitignore and skip hidden entries
    #[must_use]
    pub fn respect_ignore(mut self, yes: bool) -> Self {
        self.respect_ignore = yes;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(self.respect_ignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        walker
            .flatten()
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(ignore::DirEntry::into_path)
            .filter(|path| self.filter.matches(path))
    }
}

/// how a walked path is written in the manifest and `File:` headers
pub fn display_path(path: &Path) -> String {
    path.strip_prefix(".")
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
