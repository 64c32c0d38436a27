//! Working tree status report
//!
//! The status operation builds a [`StatusReport`] describing branches,
//! pending additions and removals, unstaged edits, and untracked files; the
//! [`Display`] impl owns the textual layout. Every list is sorted, so the
//! rendering is deterministic.
//!
//! Section headers and the current-branch marker are colorized; `colored`
//! drops the escapes on its own when stdout is not a terminal.

use colored::Colorize;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::path::PathBuf;

/// How a tracked or staged path differs from the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Modified,
    Deleted,
}

impl From<ChangeKind> for &str {
    fn from(change: ChangeKind) -> Self {
        match change {
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// Snapshot of everything `status` reports
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StatusReport {
    pub(crate) current_branch: String,
    pub(crate) branches: BTreeSet<String>,
    pub(crate) staged: BTreeSet<PathBuf>,
    pub(crate) removed: BTreeSet<PathBuf>,
    pub(crate) unstaged: BTreeMap<PathBuf, ChangeKind>,
    pub(crate) untracked: BTreeSet<PathBuf>,
}

impl StatusReport {
    fn write_header(f: &mut std::fmt::Formatter<'_>, title: &str) -> std::fmt::Result {
        writeln!(f, "{}", format!("=== {title} ===").cyan())
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Self::write_header(f, "Branches")?;
        for branch in self.branches.iter() {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        Self::write_header(f, "Staged Files")?;
        for path in self.staged.iter() {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        Self::write_header(f, "Removed Files")?;
        for path in self.removed.iter() {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        Self::write_header(f, "Modifications Not Staged For Commit")?;
        for (path, change) in self.unstaged.iter() {
            let label: &str = (*change).into();
            writeln!(f, "{} {}", path.display(), format!("({label})").red())?;
        }
        writeln!(f)?;

        Self::write_header(f, "Untracked Files")?;
        for path in self.untracked.iter() {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)
    }
}
