//! Command-line interface definitions and parsing
//!
//! The binary stands in for a host library: each subcommand reports one
//! lifecycle event of a primary file, and attachments follow.
//!
//! # Commands
//!
//! - **copied / moved / linked / hardlinked**: a primary file went from SOURCE to DESTINATION
//! - **removed**: a primary file was deleted
//! - **replay**: run a list of events in a single import session
//! - **config**: show or create the configuration file
//!
//! # Examples
//!
//! ```no_run
//! use attachfiles::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! if let Some(event) = cli.command.to_event() {
//!     println!("{event:?}");
//! }
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::events::HostEvent;

/// Mirror primary file operations onto their attachment files
#[derive(Parser, Debug, Clone)]
#[command(name = "attachfiles", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress informational output
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter when `RUST_LOG` is not set
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// A primary file was copied
    #[command(visible_alias = "cp")]
    Copied {
        /// Original location of the primary file
        source: PathBuf,
        /// New location of the primary file
        destination: PathBuf,
    },

    /// A primary file was moved
    #[command(visible_alias = "mv")]
    Moved {
        /// Original location of the primary file
        source: PathBuf,
        /// New location of the primary file
        destination: PathBuf,
    },

    /// A primary file was symlinked
    #[command(visible_alias = "ln")]
    Linked {
        /// Original location of the primary file
        source: PathBuf,
        /// Location of the link
        destination: PathBuf,
    },

    /// A primary file was hardlinked
    Hardlinked {
        /// Original location of the primary file
        source: PathBuf,
        /// Location of the hardlink
        destination: PathBuf,
    },

    /// A primary file was removed from the library
    #[command(visible_alias = "rm")]
    Removed {
        /// Path of the primary file
        path: PathBuf,

        /// The file was only dropped from the library, not deleted from disk
        #[arg(long = "keep-file")]
        keep_file: bool,
    },

    /// Run events from a file, one per line, in a single import session
    Replay {
        /// Event list (`copied SRC DST`, `moved SRC DST`, `removed PATH`, `imported`, ...)
        #[arg(value_name = "EVENTS_FILE")]
        events: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// The host event a single-event command stands for
    #[must_use]
    pub fn to_event(&self) -> Option<HostEvent> {
        match self.clone() {
            Self::Copied { source, destination } => Some(HostEvent::Copied { source, destination }),
            Self::Moved { source, destination } => Some(HostEvent::Moved { source, destination }),
            Self::Linked { source, destination } => Some(HostEvent::Linked { source, destination }),
            Self::Hardlinked { source, destination } => {
                Some(HostEvent::Hardlinked { source, destination })
            }
            Self::Removed { path, keep_file } => Some(HostEvent::Removed {
                path,
                delete: !keep_file,
            }),
            Self::Replay { .. } | Self::Config { .. } => None,
        }
    }
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}
