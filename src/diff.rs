use crate::wire::FileRecord;
use similar::TextDiff;

/// what the operator is shown before deciding on a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffView {
    /// the file does not exist yet, every line is an addition
    Added(Vec<String>),
    /// unified diff of the file on disk against the new content
    Modified(String),
    Unchanged,
}

/// compare existing on-disk text (if any) with a decoded record
pub fn diff(label: &str, existing: Option<&str>, new: &FileRecord, context: usize) -> DiffView {
    let Some(old) = existing else {
        return DiffView::Added(new.lines.clone());
    };

    let new_text = new.text();
    if old == new_text {
        return DiffView::Unchanged;
    }

    let diff = TextDiff::from_lines(old, new_text.as_str());
    let unified = diff
        .unified_diff()
        .context_radius(context)
        .header(label, label)
        .to_string();

    if unified.is_empty() {
        DiffView::Unchanged
    } else {
        DiffView::Modified(unified)
    }
}

impl DiffView {
    /// plain text form, one entry per output line
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Added(lines) => lines.iter().map(|line| format!("+{line}")).collect(),
            Self::Modified(unified) => unified.lines().map(str::to_string).collect(),
            Self::Unchanged => Vec::new(),
        }
    }

    pub fn print(&self) {
        use colored::Colorize;

        match self {
            Self::Unchanged => {
                crate::status!("(no changes)");
            }
            Self::Added(_) => {
                crate::status!("(new file)");
                for line in self.lines() {
                    crate::info!("{}", line.green());
                }
            }
            Self::Modified(_) => {
                for line in self.lines() {
                    if line.starts_with("+++") || line.starts_with("---") {
                        crate::info!("{}", line.bold());
                    } else if line.starts_with("@@") {
                        crate::info!("{}", line.cyan());
                    } else if line.starts_with('+') {
                        crate::info!("{}", line.green());
                    } else if line.starts_with('-') {
                        crate::info!("{}", line.red());
                    } else {
                        crate::info!("{}", line);
                    }
                }
            }
        }
    }
}
