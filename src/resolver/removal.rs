use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::list_directory;
use super::result::{OperationFailure, RemovalOutcome, RemovalResult};
use crate::config::{AttachSettings, FailurePolicy};
use crate::fsops;
use crate::operation::{OperationKind, parent_dir};
use crate::patterns::PatternSet;

enum Guard {
    Missing,
    Kept {
        unmatched: Vec<OsString>,
        primary_listed: bool,
    },
    Pass(BTreeSet<OsString>),
}

fn evaluate(directory: &Path, primary_name: &OsStr, patterns: &PatternSet) -> Guard {
    let listing: BTreeSet<OsString> = match list_directory(directory) {
        Ok(names) => names.into_iter().collect(),
        Err(e) => {
            debug!("{e}");
            return Guard::Missing;
        }
    };

    let mut removable = patterns.match_attachments(&listing, None);
    removable.insert(primary_name.to_os_string());

    if removable == listing {
        removable.remove(primary_name);
        return Guard::Pass(removable);
    }

    Guard::Kept {
        unmatched: listing.difference(&removable).cloned().collect(),
        primary_listed: listing.contains(primary_name),
    }
}

/// Attachments to delete alongside a deleted primary file.
///
/// Returns `None` if `directory` cannot be listed. Returns an empty set unless
/// the primary file and the names matching `patterns` make up the whole
/// directory. The primary file itself is never part of the result.
#[must_use]
pub fn compute_removable_siblings(
    directory: &Path,
    primary_name: &OsStr,
    patterns: &PatternSet,
) -> Option<BTreeSet<OsString>> {
    match evaluate(directory, primary_name, patterns) {
        Guard::Missing => None,
        Guard::Kept { .. } => Some(BTreeSet::new()),
        Guard::Pass(names) => Some(names),
    }
}

/// Delete `names` inside `directory`.
///
/// Real directories are deleted recursively, symlinks are unlinked without
/// touching what they point to.
pub fn remove_attachments(
    directory: &Path,
    names: &BTreeSet<OsString>,
    policy: FailurePolicy,
) -> (Vec<PathBuf>, Vec<OperationFailure>) {
    let mut removed = Vec::new();
    let mut failures = Vec::new();
    for name in names {
        let path = directory.join(name);
        match fsops::remove_file_or_directory(&path) {
            Ok(()) => removed.push(path),
            Err(e) => {
                warn!("Failed to remove attachment {}: {e}", path.display());
                failures.push(OperationFailure {
                    kind: OperationKind::Remove,
                    source: path,
                    target: None,
                    reason: e.to_string(),
                });
                if policy == FailurePolicy::Abort {
                    break;
                }
            }
        }
    }
    (removed, failures)
}

/// Mirror the deletion of `primary_path` onto its attachments.
///
/// Does not consult `allow_remove`; callers decide whether removal runs.
#[must_use]
pub fn remove_siblings(primary_path: &Path, settings: &AttachSettings) -> RemovalResult {
    let directory = parent_dir(primary_path);
    let Some(primary_name) = primary_path.file_name() else {
        return RemovalResult::new(
            directory,
            RemovalOutcome::Kept {
                unmatched: Vec::new(),
                primary_listed: false,
            },
        );
    };

    match evaluate(&directory, primary_name, &settings.patterns) {
        Guard::Missing => RemovalResult::new(directory, RemovalOutcome::DirectoryMissing),
        Guard::Kept {
            unmatched,
            primary_listed,
        } => {
            debug!(
                "Keeping attachments in {}: directory holds {} unrelated entries",
                directory.display(),
                unmatched.len()
            );
            RemovalResult::new(
                directory,
                RemovalOutcome::Kept {
                    unmatched,
                    primary_listed,
                },
            )
        }
        Guard::Pass(names) => {
            debug!(
                "Removing attachments in {} : {:?}",
                directory.display(),
                names
            );
            let (removed, failures) = remove_attachments(&directory, &names, settings.on_failure);
            let mut result = RemovalResult::new(directory, RemovalOutcome::Removed);
            result.removed = removed;
            result.failures = failures;
            result
        }
    }
}
