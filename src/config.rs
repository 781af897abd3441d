use crate::constants::{
    CLIPBOARD_TIMEOUT_SECS, CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_CONTEXT,
    DEFAULT_EXTENSIONS,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// user configuration, read from `config.json`
///
/// a missing file means all defaults; unknown fields are rejected so typos
/// are not silently ignored
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// file name suffixes the encoder selects
    pub extensions: Vec<String>,

    /// honour .gitignore and skip hidden files while encoding
    pub respect_ignore: bool,

    /// unchanged lines shown around each diff hunk
    pub context_lines: usize,

    /// command that reads text from stdin into the clipboard
    pub copy_command: Option<String>,

    /// command that prints the clipboard to stdout
    pub paste_command: Option<String>,

    /// how long a clipboard command may run
    pub clipboard_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            respect_ignore: false,
            context_lines: DEFAULT_CONTEXT,
            copy_command: None,
            paste_command: None,
            clipboard_timeout_secs: CLIPBOARD_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// load from an explicit path, `$CLIPDIR_CONFIG`, or the user config dir
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// an explicitly named file must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// `<config dir>/clipdir/config.json`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
