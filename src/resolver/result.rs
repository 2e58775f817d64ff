use std::ffi::OsString;
use std::path::PathBuf;

use colored::Colorize;

use crate::operation::OperationKind;
use crate::session::DedupKey;

/// How an attach request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStatus {
    /// Key already processed in this session, nothing touched
    Skipped,
    /// Every qualifying attachment was visited and the key was marked
    Completed,
    /// Stopped at the first failure, key left unmarked
    Aborted,
}

/// Attachment that was copied, moved or removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedItem {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
}

/// Attachment that qualified for a kind this crate does not carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unimplemented {
    pub kind: OperationKind,
    pub source: PathBuf,
    pub target: Option<PathBuf>,
}

/// Failed copy/move/remove of a single attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    pub kind: OperationKind,
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub reason: String,
}

impl std::fmt::Display for OperationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(tgt) => write!(
                f,
                "{} {} -> {}: {}",
                self.kind,
                self.source.display(),
                tgt.display(),
                self.reason
            ),
            None => write!(f, "{} {}: {}", self.kind, self.source.display(), self.reason),
        }
    }
}

/// Summary of one attach request
#[derive(Debug, Clone)]
pub struct AttachResult {
    pub kind: OperationKind,
    pub key: DedupKey,
    pub status: AttachStatus,
    pub attached: Vec<AttachedItem>,
    pub unimplemented: Vec<Unimplemented>,
    pub failures: Vec<OperationFailure>,
}

impl AttachResult {
    #[must_use]
    pub(crate) const fn new(kind: OperationKind, key: DedupKey) -> Self {
        Self {
            kind,
            key,
            status: AttachStatus::Completed,
            attached: Vec::new(),
            unimplemented: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn skipped(kind: OperationKind, key: DedupKey) -> Self {
        Self {
            status: AttachStatus::Skipped,
            ..Self::new(kind, key)
        }
    }

    /// 1 when the request was short-circuited by the session, else 0
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        usize::from(self.status == AttachStatus::Skipped)
    }

    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    #[must_use]
    pub fn unimplemented_count(&self) -> usize {
        self.unimplemented.len()
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.status == AttachStatus::Skipped
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn print(&self) {
        let title = format!("=== {} attachments: {} ===", self.kind, self.key);
        println!("\n{}", title.bold());
        if self.is_skipped() {
            println!("  {} already attached in this session", "⊘ Skipped:".yellow());
            return;
        }
        println!("  {} {}", "✓ Attached:".green(), self.attached_count());
        for item in &self.unimplemented {
            println!(
                "  {} {} {}",
                "⚠ Not implemented:".yellow(),
                item.kind,
                item.source.display()
            );
        }
        if self.has_failures() {
            println!("  {} {}", "✗ Errors:".red(), self.failures.len());
            for failure in &self.failures {
                println!("  - {failure}");
            }
        }
        if self.status == AttachStatus::Aborted {
            println!("  {}", "Stopped at first failure.".red());
        }
    }
}

/// Decision reached by the removal guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Directory could not be listed (already gone)
    DirectoryMissing,
    /// Something other than the primary and its attachments lives in the directory
    Kept {
        unmatched: Vec<OsString>,
        primary_listed: bool,
    },
    /// Guard passed, attachments were removed (see `removed` / `failures`)
    Removed,
}

/// Summary of mirroring a primary file deletion
#[derive(Debug, Clone)]
pub struct RemovalResult {
    pub directory: PathBuf,
    pub outcome: RemovalOutcome,
    pub removed: Vec<PathBuf>,
    pub failures: Vec<OperationFailure>,
}

impl RemovalResult {
    #[must_use]
    pub(crate) const fn new(directory: PathBuf, outcome: RemovalOutcome) -> Self {
        Self {
            directory,
            outcome,
            removed: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn print(&self) {
        let title = format!("=== remove attachments: {} ===", self.directory.display());
        println!("\n{}", title.bold());
        match &self.outcome {
            RemovalOutcome::DirectoryMissing => {
                println!("  {} directory no longer exists", "⊘ Skipped:".yellow());
            }
            RemovalOutcome::Kept { unmatched, primary_listed } => {
                println!("  {} directory holds other files", "⊘ Kept:".yellow());
                if !primary_listed {
                    println!("  - primary file is not in the directory");
                }
                for name in unmatched {
                    println!("  - {}", name.to_string_lossy());
                }
            }
            RemovalOutcome::Removed => {
                println!("  {} {}", "✓ Removed:".green(), self.removed.len());
                if !self.failures.is_empty() {
                    println!("  {} {}", "✗ Errors:".red(), self.failures.len());
                    for failure in &self.failures {
                        println!("  - {failure}");
                    }
                }
            }
        }
    }
}
