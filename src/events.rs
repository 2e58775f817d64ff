//! Host event adapter
//!
//! The host library owns *when* things happen; this module translates its
//! lifecycle callbacks into attach and removal requests. Handlers never fail:
//! attachment work is secondary to the primary file operation, so problems are
//! logged and reported in the returned [`EventReport`].

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::AttachError;
use crate::config::AttachSettings;
use crate::operation::{AttachmentOperation, OperationKind};
use crate::resolver::{self, AttachResult, RemovalResult};
use crate::session::SessionTracker;

/// Why an event produced no work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Primary file was removed from the library but left on disk
    KeptOnDisk,
    /// `allow_remove` is off
    RemovalDisabled,
}

/// What handling one event did
#[derive(Debug)]
pub enum EventReport {
    /// Import finished, session cleared
    SessionReset,
    /// Attach request ran (possibly skipped, see [`AttachResult::status`])
    Attached(AttachResult),
    /// Removal mirroring ran
    Removed(RemovalResult),
    /// Nothing to do
    Ignored(IgnoreReason),
    /// Attach request could not run at all
    Failed(AttachError),
}

/// Lifecycle callbacks a host library fires for its primary files
pub trait LibraryEvents {
    fn album_imported(&mut self) -> EventReport;
    fn item_imported(&mut self, source: &Path, destination: &Path) -> EventReport;
    fn item_copied(&mut self, source: &Path, destination: &Path) -> EventReport;
    fn item_moved(&mut self, source: &Path, destination: &Path) -> EventReport;
    fn item_linked(&mut self, source: &Path, destination: &Path) -> EventReport;
    fn item_hardlinked(&mut self, source: &Path, destination: &Path) -> EventReport;
    /// `delete` is true when the host also deleted the file from disk
    fn item_removed(&mut self, path: &Path, delete: bool) -> EventReport;
}

/// One host event as data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    AlbumImported,
    ItemImported { source: PathBuf, destination: PathBuf },
    Copied { source: PathBuf, destination: PathBuf },
    Moved { source: PathBuf, destination: PathBuf },
    Linked { source: PathBuf, destination: PathBuf },
    Hardlinked { source: PathBuf, destination: PathBuf },
    Removed { path: PathBuf, delete: bool },
}

impl HostEvent {
    /// Invoke the matching callback on `handler`
    pub fn dispatch<H: LibraryEvents + ?Sized>(&self, handler: &mut H) -> EventReport {
        match self {
            Self::AlbumImported => handler.album_imported(),
            Self::ItemImported { source, destination } => handler.item_imported(source, destination),
            Self::Copied { source, destination } => handler.item_copied(source, destination),
            Self::Moved { source, destination } => handler.item_moved(source, destination),
            Self::Linked { source, destination } => handler.item_linked(source, destination),
            Self::Hardlinked { source, destination } => handler.item_hardlinked(source, destination),
            Self::Removed { path, delete } => handler.item_removed(path, *delete),
        }
    }
}

/// Attachment mirroring for one run of the host: immutable settings plus the
/// session of directories already handled.
#[derive(Debug)]
pub struct AttachFiles {
    settings: AttachSettings,
    session: SessionTracker,
}

impl AttachFiles {
    #[must_use]
    pub fn new(settings: AttachSettings) -> Self {
        Self {
            settings,
            session: SessionTracker::new(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &AttachSettings {
        &self.settings
    }

    #[must_use]
    pub const fn session(&self) -> &SessionTracker {
        &self.session
    }

    fn reset(&mut self) -> EventReport {
        if !self.session.is_empty() {
            debug!("Import finished, forgetting {} attached directories", self.session.len());
        }
        self.session.reset();
        EventReport::SessionReset
    }

    fn transfer(&mut self, kind: OperationKind, source: &Path, destination: &Path) -> EventReport {
        let op = AttachmentOperation::for_primary(kind, source, destination);
        match resolver::attach(&op, &self.settings, &mut self.session) {
            Ok(result) => EventReport::Attached(result),
            Err(e) => {
                warn!("Could not attach files for {}: {e}", source.display());
                EventReport::Failed(e)
            }
        }
    }
}

impl LibraryEvents for AttachFiles {
    fn album_imported(&mut self) -> EventReport {
        self.reset()
    }

    fn item_imported(&mut self, _source: &Path, _destination: &Path) -> EventReport {
        self.reset()
    }

    fn item_copied(&mut self, source: &Path, destination: &Path) -> EventReport {
        self.transfer(OperationKind::Copy, source, destination)
    }

    fn item_moved(&mut self, source: &Path, destination: &Path) -> EventReport {
        self.transfer(OperationKind::Move, source, destination)
    }

    fn item_linked(&mut self, source: &Path, destination: &Path) -> EventReport {
        self.transfer(OperationKind::Link, source, destination)
    }

    fn item_hardlinked(&mut self, source: &Path, destination: &Path) -> EventReport {
        self.transfer(OperationKind::Hardlink, source, destination)
    }

    fn item_removed(&mut self, path: &Path, delete: bool) -> EventReport {
        if !delete {
            return EventReport::Ignored(IgnoreReason::KeptOnDisk);
        }
        if !self.settings.allow_remove {
            return EventReport::Ignored(IgnoreReason::RemovalDisabled);
        }
        EventReport::Removed(resolver::remove_siblings(path, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{AttachStatus, RemovalOutcome};
    use crate::testing::TestLibrary;

    fn plugin(patterns: &[&str]) -> AttachFiles {
        AttachFiles::new(AttachSettings::with_patterns(patterns.iter().copied()).unwrap())
    }

    fn attached(report: EventReport) -> AttachResult {
        match report {
            EventReport::Attached(result) => result,
            other => panic!("Expected Attached, got {other:?}"),
        }
    }

    #[test]
    fn test_item_copied_attaches_from_parent_dirs() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        let result = attached(plugin.item_copied(&track, &lib.destination().join("track.mp3")));

        assert_eq!(result.attached_count(), 1);
        assert!(lib.destination().join("cover.jpg").exists());
    }

    #[test]
    fn test_second_track_of_same_directory_is_skipped() {
        let lib = TestLibrary::new();
        let one = lib.source_file("01.mp3");
        let two = lib.source_file("02.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        plugin.item_moved(&one, &lib.destination().join("01.mp3"));
        let second = attached(plugin.item_moved(&two, &lib.destination().join("02.mp3")));

        assert_eq!(second.status, AttachStatus::Skipped);
    }

    #[test]
    fn test_import_resets_session() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        plugin.item_copied(&track, &lib.destination().join("track.mp3"));
        assert_eq!(plugin.session().len(), 1);

        assert!(matches!(
            plugin.item_imported(&track, &lib.destination().join("track.mp3")),
            EventReport::SessionReset
        ));
        assert!(plugin.session().is_empty());

        plugin.item_copied(&track, &lib.destination().join("track.mp3"));
        assert!(matches!(plugin.album_imported(), EventReport::SessionReset));
        assert!(plugin.session().is_empty());
    }

    #[test]
    fn test_linked_reports_unimplemented_without_failing() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        let result = attached(plugin.item_linked(&track, &lib.destination().join("track.mp3")));

        assert_eq!(result.unimplemented_count(), 1);
        assert_eq!(result.unimplemented[0].kind, OperationKind::Link);
    }

    #[test]
    fn test_missing_source_directory_is_contained() {
        let lib = TestLibrary::new();
        let mut plugin = plugin(&["*.jpg"]);

        let report = plugin.item_copied(
            &lib.root().join("gone/track.mp3"),
            &lib.destination().join("track.mp3"),
        );

        assert!(matches!(
            report,
            EventReport::Failed(AttachError::DirectoryUnavailable { .. })
        ));
    }

    #[test]
    fn test_removed_without_delete_is_ignored() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        let report = plugin.item_removed(&track, false);

        assert!(matches!(report, EventReport::Ignored(IgnoreReason::KeptOnDisk)));
        assert!(lib.source().join("cover.jpg").exists());
    }

    #[test]
    fn test_removal_disabled() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let settings = AttachSettings::with_patterns(["*.jpg"]).unwrap().allow_remove(false);
        let mut plugin = AttachFiles::new(settings);

        let report = plugin.item_removed(&track, true);

        assert!(matches!(report, EventReport::Ignored(IgnoreReason::RemovalDisabled)));
        assert!(lib.source().join("cover.jpg").exists());
    }

    #[test]
    fn test_removed_deletes_attachments() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        match plugin.item_removed(&track, true) {
            EventReport::Removed(result) => assert_eq!(result.outcome, RemovalOutcome::Removed),
            other => panic!("Expected Removed, got {other:?}"),
        }
        assert!(!lib.source().join("cover.jpg").exists());
    }

    #[test]
    fn test_host_event_dispatch() {
        let lib = TestLibrary::new();
        let track = lib.source_file("track.mp3");
        lib.source_file("cover.jpg");
        let mut plugin = plugin(&["*.jpg"]);

        let event = HostEvent::Copied {
            source: track.clone(),
            destination: lib.destination().join("track.mp3"),
        };
        let result = attached(event.dispatch(&mut plugin));

        assert_eq!(result.kind, OperationKind::Copy);
        assert!(matches!(
            HostEvent::AlbumImported.dispatch(&mut plugin),
            EventReport::SessionReset
        ));
    }
}
