use crate::decision::Decision;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// clipdir: carry source files between a directory tree and the clipboard
#[derive(Parser, Debug)]
#[command(name = "clipdir", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// configuration file (default: $CLIPDIR_CONFIG or the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// copy matching files under a directory into one buffer
    #[command(visible_alias = "copy")]
    Encode(EncodeArgs),

    /// write the files in a buffer back to disk, optionally committing them
    #[command(visible_alias = "paste")]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// directory to walk
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// file suffix to include, repeatable (replaces the configured list)
    #[arg(long = "ext", short = 'e', value_name = "SUFFIX")]
    pub extensions: Vec<String>,

    /// honour .gitignore and skip hidden files
    #[arg(long)]
    pub respect_ignore: bool,

    /// print the buffer instead of copying it
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// write the buffer to a file instead of copying it
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// treat the whole buffer as the content of this one file
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: Option<String>,

    /// read the buffer from a file, or - for stdin, instead of the clipboard
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// directory that relative paths are written under
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// answer every prompt with this choice instead of asking
    #[arg(long, value_enum, value_name = "CHOICE")]
    pub all: Option<Choice>,

    /// commit message when the buffer has no Commit: line
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// don't print diffs before each prompt
    #[arg(long)]
    pub no_diff: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Choice {
    #[value(alias = "c")]
    Commit,
    #[value(alias = "o")]
    Overwrite,
    #[value(alias = "s")]
    Skip,
}

impl From<Choice> for Decision {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Commit => Self::Commit,
            Choice::Overwrite => Self::Overwrite,
            Choice::Skip => Self::Skip,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_encode_defaults() {
        let cli = Cli::try_parse_from(["clipdir", "encode"]).unwrap();
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.directory, PathBuf::from("."));
        assert!(args.extensions.is_empty());
        assert!(!args.stdout);
    }

    #[test]
    fn test_decode_flags() {
        let cli = Cli::try_parse_from([
            "clipdir", "paste", "--file", "x.txt", "--all", "o", "-m", "sync",
        ])
        .unwrap();
        let Command::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.file.as_deref(), Some("x.txt"));
        assert!(matches!(args.all, Some(Choice::Overwrite)));
        assert_eq!(args.message.as_deref(), Some("sync"));
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        assert!(Cli::try_parse_from(["clipdir", "encode", "--stdout", "-o", "buf.txt"]).is_err());
    }
}
