mod cli;
mod commit_set;
mod config;
mod constants;
mod context;
mod decision;
mod decode;
mod diff;
mod encode;
mod exchange;
mod filter;
mod git;
mod operator;
mod ui;
mod wire;

#[cfg(test)]
mod test_support;

use crate::cli::{Cli, Command, DecodeArgs, EncodeArgs};
use crate::config::Config;
use crate::constants::MAX_FAILURES_TO_SHOW;
use crate::context::DecodeContext;
use crate::decision::Operator;
use crate::encode::Encoded;
use crate::exchange::{Exchange, FileExchange, SystemClipboard};
use crate::filter::{CandidateFiles, ExtensionFilter};
use crate::git::{GitRepo, Unversioned, Vcs};
use crate::operator::{FixedOperator, TerminalOperator};
use crate::ui::{count, plural};
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Encode(args) => run_encode(&config, &args),
        Command::Decode(args) => run_decode(&config, &args),
    }
}

fn run_encode(config: &Config, args: &EncodeArgs) -> Result<()> {
    if !args.directory.is_dir() {
        bail!("{} is not a directory", args.directory.display());
    }

    let filter = if args.extensions.is_empty() {
        ExtensionFilter::new(&config.extensions)
    } else {
        ExtensionFilter::new(&args.extensions)
    };
    if filter.suffixes().is_empty() {
        bail!("no file extensions configured");
    }
    let candidates = CandidateFiles::new(&args.directory, filter)
        .respect_ignore(args.respect_ignore || config.respect_ignore);

    let mut exchange: Box<dyn Exchange> = if args.stdout {
        Box::new(FileExchange::new("-"))
    } else if let Some(path) = &args.output {
        Box::new(FileExchange::new(path))
    } else {
        Box::new(SystemClipboard::from_config(config)?)
    };

    let encoded = encode_with_spinner(&candidates);

    // keep stdout clean when it carries the buffer
    let mut report: Box<dyn Write> = if args.stdout {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    print_manifest(&encoded, &mut report);
    report_encode_problems(&encoded);

    if encoded.manifest.is_empty() {
        warning!("no matching files found, nothing copied");
        return Ok(());
    }

    exchange
        .write(&encoded.buffer)
        .with_context(|| format!("failed to write to {}", exchange.describe()))?;
    if !args.stdout {
        status!(
            "copied {} {} to {}",
            encoded.manifest.len(),
            plural(encoded.manifest.len(), "file"),
            exchange.describe()
        );
    }
    Ok(())
}

/// encode while showing which file is being read
fn encode_with_spinner(candidates: &CandidateFiles) -> Encoded {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let encoded = encode::encode(candidates, |path| spinner.set_message(path.to_string()));

    spinner.finish_and_clear();
    encoded
}

fn print_manifest(encoded: &Encoded, out: &mut dyn Write) {
    let _ = writeln!(out, "copied files:");
    for path in &encoded.manifest {
        let _ = writeln!(out, "{path}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "total words: {}", count(encoded.total_words));
}

fn report_encode_problems(encoded: &Encoded) {
    for path in &encoded.collisions {
        warning!(
            "{} contains a line starting with \"File: \" and will not decode intact",
            path
        );
    }

    if encoded.failures.is_empty() {
        return;
    }
    error!(
        "failed to read {} {}:",
        encoded.failures.len(),
        plural(encoded.failures.len(), "file")
    );
    for failure in encoded.failures.iter().take(MAX_FAILURES_TO_SHOW) {
        error!("  {}: {}", failure.path, failure.reason);
    }
    if encoded.failures.len() > MAX_FAILURES_TO_SHOW {
        error!("  (+{} more)", encoded.failures.len() - MAX_FAILURES_TO_SHOW);
    }
}

fn run_decode(config: &Config, args: &DecodeArgs) -> Result<()> {
    let interactive = args.all.is_none();
    if interactive {
        // sanity checks
        if !io::stdout().is_terminal() {
            bail!("interactive terminal required (pass --all to decide without prompts)");
        }
        if args.input.as_deref().is_some_and(|p| p.as_os_str() == "-") {
            bail!("reading the buffer from stdin requires --all");
        }
    }

    let mut exchange: Box<dyn Exchange> = match &args.input {
        Some(path) => Box::new(FileExchange::new(path)),
        None => Box::new(SystemClipboard::from_config(config)?),
    };
    let buffer = exchange
        .read()
        .with_context(|| format!("failed to read {}", exchange.describe()))?;

    let mut bundle = match &args.file {
        Some(target) => wire::parse_single(&buffer, target),
        None => wire::parse(&buffer),
    };
    if bundle.commit_message.is_none() {
        bundle.commit_message.clone_from(&args.message);
    }

    if bundle.dropped_lines > 0 {
        warning!(
            "ignored {} {} before the first \"File: \" header",
            bundle.dropped_lines,
            plural(bundle.dropped_lines, "line")
        );
    }
    if bundle.redeclared > 0 {
        warning!(
            "{} {} repeated; the last copy of each file is used",
            bundle.redeclared,
            plural(bundle.redeclared, "header")
        );
    }
    if bundle.files.is_empty() {
        warning!("no files found in {}", exchange.describe());
    } else {
        status!(
            "{} {} in {}",
            bundle.files.len(),
            plural(bundle.files.len(), "file"),
            exchange.describe()
        );
    }

    let mut ctx = DecodeContext::new(&args.root, config.context_lines)?;
    ctx.show_diff = !args.no_diff;

    let mut vcs: Box<dyn Vcs> = match GitRepo::discover(&ctx.root) {
        Ok(repo) => {
            if let Some(problem) = repo.sanity_check() {
                warning!(problem);
            }
            Box::new(repo)
        }
        Err(e) => {
            warning!("{:#}; files can be written but not committed", e);
            Box::new(Unversioned)
        }
    };

    let mut operator: Box<dyn Operator> = match args.all {
        Some(choice) => Box::new(FixedOperator::new(choice.into())),
        None => Box::new(TerminalOperator),
    };

    let summary = decode::decode(&ctx, &bundle, operator.as_mut(), vcs.as_mut())?;
    summary.print();
    Ok(())
}
