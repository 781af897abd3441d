use crate::config::Config;
use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// where buffers travel between encode and decode
pub trait Exchange {
    fn read(&mut self) -> Result<String>;
    fn write(&mut self, text: &str) -> Result<()>;
    /// for messages like "copied to the clipboard"
    fn describe(&self) -> String;
}

/// the desktop clipboard, reached through helper commands
#[derive(Debug)]
pub struct SystemClipboard {
    copy: Vec<String>,
    paste: Vec<String>,
    timeout: Duration,
}

impl SystemClipboard {
    /// configured commands win over the platform defaults
    pub fn from_config(config: &Config) -> Result<Self> {
        let (default_copy, default_paste) = platform_commands();
        let copy = match &config.copy_command {
            Some(command) => split_command(command)?,
            None => default_copy.iter().map(|s| (*s).to_string()).collect(),
        };
        let paste = match &config.paste_command {
            Some(command) => split_command(command)?,
            None => default_paste.iter().map(|s| (*s).to_string()).collect(),
        };
        Ok(Self {
            copy,
            paste,
            timeout: Duration::from_secs(config.clipboard_timeout_secs),
        })
    }
}

impl Exchange for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        let data = run_paste(&self.paste, self.timeout)?;
        String::from_utf8(data).map_err(|_| anyhow!("clipboard does not contain UTF-8 text"))
    }

    fn write(&mut self, text: &str) -> Result<()> {
        run_copy(&self.copy, text, self.timeout)
    }

    fn describe(&self) -> String {
        "the clipboard".to_string()
    }
}

/// a file, or stdin/stdout for `-`
#[derive(Debug)]
pub struct FileExchange {
    path: PathBuf,
}

impl FileExchange {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdio(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl Exchange for FileExchange {
    fn read(&mut self) -> Result<String> {
        if self.is_stdio() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        } else {
            fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read {}", self.path.display()))
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if self.is_stdio() {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")
        } else {
            fs::write(&self.path, text)
                .with_context(|| format!("failed to write {}", self.path.display()))
        }
    }

    fn describe(&self) -> String {
        if self.is_stdio() {
            "stdout".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

fn split_command(command: &str) -> Result<Vec<String>> {
    match shlex::split(command) {
        Some(argv) if !argv.is_empty() => Ok(argv),
        _ => bail!("invalid clipboard command: {command}"),
    }
}

#[cfg(target_os = "macos")]
fn platform_commands() -> (Vec<&'static str>, Vec<&'static str>) {
    (vec!["pbcopy"], vec!["pbpaste"])
}

#[cfg(target_os = "windows")]
fn platform_commands() -> (Vec<&'static str>, Vec<&'static str>) {
    (
        vec!["clip"],
        vec!["powershell", "-NoProfile", "-Command", "Get-Clipboard -Raw"],
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_commands() -> (Vec<&'static str>, Vec<&'static str>) {
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        (vec!["wl-copy"], vec!["wl-paste", "--no-newline"])
    } else {
        (
            vec!["xclip", "-selection", "clipboard"],
            vec!["xclip", "-selection", "clipboard", "-o"],
        )
    }
}

/// feed `text` to the copy command
///
/// copy helpers such as xclip keep running in the background to serve the
/// selection, so their output is not captured
fn run_copy(argv: &[String], text: &str, timeout: Duration) -> Result<()> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run {}", argv[0]))?;

    // write input to stdin and close it
    if let Some(mut stdin) = child.stdin.take()
        && let Err(e) = stdin.write_all(text.as_bytes())
    {
        let _ = child.kill();
        let _ = child.wait();
        bail!("failed to write to {}: {e}", argv[0]);
    }

    match child.wait_timeout(timeout) {
        Ok(Some(status)) if status.success() => Ok(()),
        Ok(Some(status)) => bail!("{} failed with exit code: {}", argv[0], status),
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            bail!("{} did not finish within {}s", argv[0], timeout.as_secs())
        }
        Err(e) => bail!("failed to wait for {}: {e}", argv[0]),
    }
}

/// run the paste command and collect its stdout
fn run_paste(argv: &[String], timeout: Duration) -> Result<Vec<u8>> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to run {}", argv[0]))?;

    // drain stdout while waiting so a large clipboard cannot fill the pipe
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("failed to capture {} output", argv[0]))?;
    let reader = std::thread::spawn(move || {
        let mut data = Vec::new();
        stdout.read_to_end(&mut data).map(|_| data)
    });

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let data = reader
                .join()
                .map_err(|_| anyhow!("failed to read {} output", argv[0]))?
                .with_context(|| format!("failed to read {} output", argv[0]))?;

            if !status.success() {
                let mut stderr_data = String::new();
                if let Some(mut stderr) = child.stderr.take() {
                    let _ = stderr.read_to_string(&mut stderr_data);
                }
                bail!(
                    "{} failed with exit code: {} {}",
                    argv[0],
                    status,
                    stderr_data.trim()
                );
            }
            Ok(data)
        }
        Ok(None) => {
            // timeout occurred, kill the process
            let _ = child.kill();
            let _ = child.wait();
            bail!("{} did not finish within {}s", argv[0], timeout.as_secs())
        }
        Err(e) => bail!("failed to wait for {}: {e}", argv[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("xclip -selection 'clip board'").unwrap(),
            ["xclip", "-selection", "clip board"]
        );
        assert!(split_command("").is_err());
        assert!(split_command("unterminated 'quote").is_err());
    }

    #[test]
    fn test_file_exchange_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut exchange = FileExchange::new(dir.path().join("buffer.txt"));
        exchange.write("File: a.py\nx\n\n").unwrap();
        assert_eq!(exchange.read().unwrap(), "File: a.py\nx\n\n");
        assert!(exchange.describe().ends_with("buffer.txt"));
        assert_eq!(FileExchange::new("-").describe(), "stdout");
    }

    #[test]
    fn test_file_exchange_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut exchange = FileExchange::new(dir.path().join("missing.txt"));
        assert!(exchange.read().is_err());
    }

    #[cfg(unix)]
    fn clipboard_via(dir: &std::path::Path, timeout_secs: u64) -> SystemClipboard {
        let store = dir.join("store.txt").display().to_string();
        SystemClipboard::from_config(&Config {
            copy_command: Some(format!("sh -c 'cat > {store}'")),
            paste_command: Some(format!("cat {store}")),
            clipboard_timeout_secs: timeout_secs,
            ..Config::default()
        })
        .unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_commands_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut clipboard = clipboard_via(dir.path(), 5);
        let text = "Commit: sync\nFile: a.py\nprint('hi')\n\n".repeat(5000);
        clipboard.write(&text).unwrap();
        assert_eq!(clipboard.read().unwrap(), text);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_paste_command() {
        let dir = tempfile::tempdir().unwrap();
        // nothing copied yet, so cat fails
        let mut clipboard = clipboard_via(dir.path(), 5);
        assert!(clipboard.read().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_times_out() {
        let mut clipboard = SystemClipboard::from_config(&Config {
            paste_command: Some("sleep 5".to_string()),
            clipboard_timeout_secs: 1,
            ..Config::default()
        })
        .unwrap();
        let err = clipboard.read().unwrap_err();
        assert!(err.to_string().contains("did not finish"));
    }
}
