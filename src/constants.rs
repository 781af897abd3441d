// wire format
pub const FILE_PREFIX: &str = "File: ";
pub const COMMIT_PREFIX: &str = "Commit: ";

// filter
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".py", ".go", ".rs"];

// diff
pub const DEFAULT_CONTEXT: usize = 3;

// clipboard
pub const CLIPBOARD_TIMEOUT_SECS: u64 = 5;

// config
pub const CONFIG_DIR_NAME: &str = "clipdir";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_ENV_VAR: &str = "CLIPDIR_CONFIG";

// ui
pub const MAX_FAILURES_TO_SHOW: usize = 10;
