//! Import session tracking
//!
//! A session spans two consecutive import-completed signals. Within one session
//! a source directory (or source/destination pair) has its attachments applied
//! at most once.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Key identifying one attach unit of work
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// Source directory only (multiple copies not allowed)
    Source(PathBuf),
    /// Source and destination directory (multiple copies allowed)
    SourceAndDestination(PathBuf, PathBuf),
}

impl DedupKey {
    /// Build the key for an operation.
    ///
    /// A missing destination with `allow_multiple_copies` still yields a
    /// source-only key.
    #[must_use]
    pub fn new(source_dir: &Path, destination_dir: Option<&Path>, allow_multiple_copies: bool) -> Self {
        match destination_dir {
            Some(dst) if allow_multiple_copies => {
                Self::SourceAndDestination(source_dir.to_path_buf(), dst.to_path_buf())
            }
            _ => Self::Source(source_dir.to_path_buf()),
        }
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        match self {
            Self::Source(src) | Self::SourceAndDestination(src, _) => src,
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(src) => write!(f, "{}", src.display()),
            Self::SourceAndDestination(src, dst) => {
                write!(f, "{} -> {}", src.display(), dst.display())
            }
        }
    }
}

/// Set of keys already processed in the current session.
///
/// Key-type agnostic; the resolver uses [`DedupKey`].
#[derive(Debug, Clone)]
pub struct SessionTracker<K = DedupKey> {
    processed: HashSet<K>,
}

impl<K> Default for SessionTracker<K> {
    fn default() -> Self {
        Self {
            processed: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> SessionTracker<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` once `key` has been marked in this session
    #[must_use]
    pub fn should_process(&self, key: &K) -> bool {
        !self.processed.contains(key)
    }

    /// Record `key` as processed. Marking twice is a no-op.
    pub fn mark_processed(&mut self, key: K) {
        self.processed.insert(key);
    }

    /// Start a new session
    pub fn reset(&mut self) {
        self.processed.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}
