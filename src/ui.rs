use anyhow::{Context, Result};

#[macro_export]
macro_rules! warning {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).yellow());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).yellow());
    }};
}

#[macro_export]
macro_rules! error {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!($fmt $(, $($arg)*)?).red());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stderr(), "{}", format!("{}", $expr).red());
    }};
}

#[macro_export]
macro_rules! status {
    // format string literal (with or without inline formatting)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!($fmt $(, $($arg)*)?).green());
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use colored::Colorize;
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", format!("{}", $expr).green());
    }};
}

#[macro_export]
macro_rules! info {
    () => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout());
    }};
    // format string literal (with or without inline formatting or args)
    ($fmt:literal $(, $($arg:tt)*)?) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), $fmt $(, $($arg)*)?);
    }};
    // arbitrary expression (non-literal)
    ($expr:expr) => {{
        use std::io::{self, Write};
        let _ = writeln!(io::stdout(), "{}", $expr);
    }};
}

/// show "[c]ommit/[o]verwrite/[s]kip ? " and read a single key
///
/// returns the lowercased key, or an empty string for enter. the caller
/// decides whether the key is valid; esc and ctrl-c exit the process.
pub fn prompt(label: &str, options: &[&str]) -> Result<String> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        terminal::{disable_raw_mode, enable_raw_mode},
    };
    use std::io::{self, Write};

    debug_assert!(!options.is_empty(), "prompt requires at least one option");

    // build prompt string like "[c]ommit/[o]verwrite/[s]kip"
    let prompt_parts: Vec<String> = options
        .iter()
        .filter_map(|opt| {
            let first = opt.chars().next()?;
            let rest = &opt[first.len_utf8()..];
            Some(format!("[{first}]{rest}"))
        })
        .collect();

    print!("{label}{} ? ", prompt_parts.join("/"));
    let _ = io::stdout().flush();

    // enable raw mode for single-character input
    enable_raw_mode().context("this command requires an interactive terminal")?;

    loop {
        let Ok(Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        })) = event::read()
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        match code {
            KeyCode::Esc => {
                disable_raw_mode().ok();
                info!("^C");
                std::process::exit(1);
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                disable_raw_mode().ok();
                info!("^C");
                std::process::exit(1);
            }
            KeyCode::Enter => {
                disable_raw_mode().ok();
                info!();
                break Ok(String::new());
            }
            KeyCode::Char(c) => {
                disable_raw_mode().ok();
                let lower: String = c.to_lowercase().collect();
                match options.iter().find(|opt| opt.starts_with(lower.as_str())) {
                    Some(option) => info!(option),
                    None => info!(lower),
                }
                break Ok(lower);
            }
            _ => {}
        }
    }
}

/// read one line with an editable initial value
pub fn edit_one_line(label: &str, line: &str) -> Result<String> {
    use rustyline::DefaultEditor;

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;

    if let Ok(edited) = editor.readline_with_initial(label, (line, "")) {
        Ok(edited.trim().to_string())
    } else {
        info!("^C");
        std::process::exit(1);
    }
}

/// block until the operator presses enter; false if they typed "n"
pub fn wait_for_enter(message: &str) -> Result<bool> {
    use colored::Colorize;
    use rustyline::DefaultEditor;

    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;
    let label = format!("{} ", message.yellow());

    if let Ok(answer) = editor.readline(&label) {
        Ok(!answer.trim().eq_ignore_ascii_case("n"))
    } else {
        info!("^C");
        std::process::exit(1);
    }
}

/// format a count with thousands separators
pub fn count(n: usize) -> String {
    use num_format::{Locale, ToFormattedString};
    n.to_formatted_string(&Locale::en)
}

/// "file" or "files"
pub fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_uses_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(1234567), "1,234,567");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file"), "file");
        assert_eq!(plural(0, "file"), "files");
        assert_eq!(plural(3, "word"), "words");
    }
}
