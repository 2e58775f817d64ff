//! Attachment resolution and dispatch
//!
//! - [`attach`]: mirror a copy/move/link/hardlink/remove of a primary file onto
//!   the attachments in its source directory, once per session key
//! - [`removal`]: decide whether a deleted primary file takes its attachments
//!   with it, and remove them

mod removal;
mod result;

pub use removal::{compute_removable_siblings, remove_attachments, remove_siblings};
pub use result::{
    AttachResult, AttachStatus, AttachedItem, OperationFailure, RemovalOutcome, RemovalResult,
    Unimplemented,
};

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::AttachError;
use crate::config::{AttachSettings, FailurePolicy};
use crate::fsops;
use crate::operation::{AttachmentOperation, OperationKind};
use crate::session::{DedupKey, SessionTracker};

type Result<T> = std::result::Result<T, AttachError>;

/// Leaf names of one directory.
///
/// # Errors
/// Returns `AttachError::DirectoryUnavailable` if the directory or one of its
/// entries cannot be read.
pub fn list_directory(dir: &Path) -> Result<Vec<OsString>> {
    let unavailable = |source: std::io::Error| AttachError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(unavailable)?
        .map(|entry| entry.map(|e| e.file_name()).map_err(unavailable))
        .collect()
}

/// Apply `op` to every attachment of `op.source_dir`.
///
/// Returns a `Skipped` result without touching the filesystem if the dedup key
/// was already processed in this session. Link and hardlink requests are
/// reported per attachment as [`Unimplemented`]. Failed items are recorded in
/// the result; with [`FailurePolicy::Abort`] the first failure ends the
/// request and the key stays unmarked.
///
/// # Errors
/// * Returns `AttachError::DirectoryUnavailable` if the source directory cannot
///   be listed; nothing is changed in that case.
/// * Returns `AttachError::MissingDestination` for a transfer kind without a
///   destination directory.
pub fn attach(
    op: &AttachmentOperation,
    settings: &AttachSettings,
    session: &mut SessionTracker,
) -> Result<AttachResult> {
    let key = DedupKey::new(
        &op.source_dir,
        op.destination_dir(),
        settings.allow_multiple_copies,
    );

    if !session.should_process(&key) {
        if settings.allow_multiple_copies {
            debug!("{key} already attached");
        } else {
            debug!(
                "{} already attached and multiple copies not allowed",
                op.source_dir.display()
            );
        }
        return Ok(AttachResult::skipped(op.kind, key));
    }

    let destination = match op.destination_dir() {
        None if op.kind.needs_destination() => {
            return Err(AttachError::MissingDestination(op.kind));
        }
        dst => dst,
    };

    match destination {
        Some(dst) => debug!(
            "Attaching {} to {}",
            op.source_dir.display(),
            dst.display()
        ),
        None => debug!("Removing attachments of {}", op.source_dir.display()),
    }

    let listing = list_directory(&op.source_dir)?;
    let names = settings.patterns.match_attachments(&listing, None);

    let mut result = AttachResult::new(op.kind, key.clone());
    for name in names {
        let src = op.source_dir.join(&name);
        let tgt = destination.map(|d| d.join(&name));

        if !op.kind.is_implemented() {
            warn!(
                "attaching files by {}ing is not implemented yet ({}, {})",
                op.kind,
                src.display(),
                tgt.as_deref().unwrap_or(Path::new("")).display()
            );
            result.unimplemented.push(Unimplemented {
                kind: op.kind,
                source: src,
                target: tgt,
            });
            continue;
        }

        match apply(op.kind, &src, tgt.as_deref()) {
            Ok(()) => result.attached.push(AttachedItem {
                source: src,
                target: tgt,
            }),
            Err(e) => {
                warn!("Failed to {} attachment {}: {e}", op.kind, src.display());
                result.failures.push(OperationFailure {
                    kind: op.kind,
                    source: src,
                    target: tgt,
                    reason: e.to_string(),
                });
                if settings.on_failure == FailurePolicy::Abort {
                    result.status = AttachStatus::Aborted;
                    return Ok(result);
                }
            }
        }
    }

    if result.attached_count() > 0 {
        info!(
            "{} {} attachment(s) from {}",
            op.kind,
            result.attached_count(),
            op.source_dir.display()
        );
    }
    session.mark_processed(key);
    Ok(result)
}

fn apply(kind: OperationKind, src: &Path, tgt: Option<&Path>) -> std::io::Result<()> {
    match (kind, tgt) {
        (OperationKind::Copy, Some(tgt)) => fsops::copy_file_or_directory(src, tgt),
        (OperationKind::Move, Some(tgt)) => fsops::move_file_or_directory(src, tgt),
        (OperationKind::Remove, _) => fsops::remove_file_or_directory(src),
        (kind, _) => Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            format!("cannot {kind} without a destination"),
        )),
    }
}
