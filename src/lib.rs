//! Attachfiles - mirror primary file operations onto companion files
//!
//! When a primary file (a track in a music library, say) is copied, moved,
//! linked or deleted, the files sharing its source directory that match a set
//! of glob patterns (artwork, rip logs, cue sheets, ...) follow along. Each
//! source directory is handled at most once per import session.

use std::path::PathBuf;

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod fsops;
pub mod operation;
pub mod patterns;
pub mod resolver;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use config::{AttachConfig, AttachSettings, FailurePolicy};
pub use events::{AttachFiles, EventReport, HostEvent, IgnoreReason, LibraryEvents};
pub use operation::{AttachmentOperation, OperationKind};
pub use patterns::{PatternError, PatternSet};
pub use resolver::{AttachResult, AttachStatus, RemovalOutcome, RemovalResult, attach};
pub use session::{DedupKey, SessionTracker};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum AttachError {
    /// Source directory vanished or cannot be listed
    #[error("Directory unavailable: {}: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A transfer kind was requested without a destination directory
    #[error("Operation '{0}' requires a destination directory")]
    MissingDestination(OperationKind),
    /// Pattern error
    #[error("Pattern error: {0}")]
    PatternError(#[from] PatternError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
