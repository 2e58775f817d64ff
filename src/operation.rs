//! Operation kinds mirrored onto attachments

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Filesystem operation applied to each attachment.
///
/// Exactly one kind per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Copy,
    Move,
    Link,
    Hardlink,
    Remove,
}

impl OperationKind {
    /// Whether the kind writes into a destination directory
    #[must_use]
    pub const fn needs_destination(self) -> bool {
        !matches!(self, Self::Remove)
    }

    /// Link kinds are recognised but not carried out
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        !matches!(self, Self::Link | Self::Hardlink)
    }

    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
            Self::Link => "symlink",
            Self::Hardlink => "hardlink",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// One attach request built from a host event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentOperation {
    pub source_dir: PathBuf,
    pub destination_dir: Option<PathBuf>,
    pub kind: OperationKind,
}

impl AttachmentOperation {
    /// Transfer-type operation (copy, move, link, hardlink)
    #[must_use]
    pub fn transfer(kind: OperationKind, source_dir: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: Some(destination_dir.into()),
            kind,
        }
    }

    /// Removal of the attachments in `source_dir`
    #[must_use]
    pub fn remove(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: None,
            kind: OperationKind::Remove,
        }
    }

    /// Build the operation for a primary file that went from `source` to
    /// `destination`: attachments live next to the primary on both sides.
    #[must_use]
    pub fn for_primary(kind: OperationKind, source: &Path, destination: &Path) -> Self {
        Self::transfer(kind, parent_dir(source), parent_dir(destination))
    }

    #[must_use]
    pub fn destination_dir(&self) -> Option<&Path> {
        self.destination_dir.as_deref()
    }
}

/// Directory containing `path`. A bare file name lives in the current directory.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
