//! Replay command - run an event list in one import session
//!
//! One event per line, fields separated by tabs when the line contains a tab
//! and by whitespace otherwise. Blank lines and `#` comments are skipped; on a
//! tab-separated line a comment has to start its own field.
//!
//! ```text
//! copied   /in/album/01.flac  /lib/Artist/Album/01.flac
//! moved    /in/album/02.flac  /lib/Artist/Album/02.flac
//! linked   SRC DST
//! hardlinked SRC DST
//! imported SRC DST        # one item finished importing
//! album-imported          # whole album finished importing
//! removed  /lib/Artist/Album/01.flac   # deleted from disk
//! dropped  /lib/Artist/Album/02.flac   # removed from the library only
//! ```

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::event::print_report;
use crate::AttachError;
use crate::events::{AttachFiles, EventReport, HostEvent};
use crate::resolver::AttachStatus;

type Result<T> = std::result::Result<T, AttachError>;

/// Counters over a replayed event list
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub attached: usize,
    pub skipped: usize,
    pub removed: usize,
    pub unimplemented: usize,
    pub errors: usize,
    pub error_messages: Vec<String>,
}

impl ReplaySummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &EventReport) {
        self.events += 1;
        match report {
            EventReport::Attached(result) => {
                self.attached += result.attached_count();
                self.unimplemented += result.unimplemented_count();
                if result.status == AttachStatus::Skipped {
                    self.skipped += 1;
                }
                for failure in &result.failures {
                    self.add_error(failure.to_string());
                }
            }
            EventReport::Removed(result) => {
                self.removed += result.removed.len();
                for failure in &result.failures {
                    self.add_error(failure.to_string());
                }
            }
            EventReport::Failed(e) => self.add_error(e.to_string()),
            EventReport::SessionReset | EventReport::Ignored(_) => {}
        }
    }

    fn add_error(&mut self, msg: String) {
        self.errors += 1;
        self.error_messages.push(msg);
    }

    pub fn print(&self) {
        println!("\n{}", "=== Replay Summary ===".bold());
        println!("  Events: {}", self.events);
        println!("  {} {}", "✓ Attached:".green(), self.attached);
        println!("  {} {}", "✓ Removed:".green(), self.removed);
        if self.skipped > 0 {
            println!("  {} {}", "⊘ Already attached:".yellow(), self.skipped);
        }
        if self.unimplemented > 0 {
            println!("  {} {}", "⚠ Not implemented:".yellow(), self.unimplemented);
        }
        if self.errors > 0 {
            println!("  {} {}", "✗ Errors:".red(), self.errors);
            println!("\n{}", "Error details:".red().bold());
            for msg in &self.error_messages {
                println!("  - {msg}");
            }
        }
    }
}

/// Replay the events in `input_path` through `plugin`
///
/// # Errors
/// Returns `AttachError::InvalidInput` if the file cannot be read or a line
/// is malformed. Nothing runs in that case.
pub fn execute(plugin: &mut AttachFiles, input_path: &Path, quiet: bool) -> Result<ReplaySummary> {
    let content = std::fs::read_to_string(input_path).map_err(|e| {
        AttachError::InvalidInput(format!("Failed to read {}: {}", input_path.display(), e))
    })?;
    let events = parse_events(&content)?;
    if events.is_empty() && !quiet {
        println!("No events found in input.");
    }

    let mut summary = ReplaySummary::new();
    for event in &events {
        let report = event.dispatch(plugin);
        if !quiet {
            print_report(&report);
        }
        summary.record(&report);
    }
    if !quiet {
        summary.print();
    }
    Ok(summary)
}

/// Parse an event list
///
/// # Errors
/// Returns `AttachError::InvalidInput` naming the line of the first unknown
/// verb or wrong argument count.
pub fn parse_events(content: &str) -> Result<Vec<HostEvent>> {
    let mut events = Vec::new();
    for (i, line) in content.lines().enumerate() {
        // Tab-separated paths may contain " #", so only a field can open a comment
        let fields: Vec<&str> = if line.contains('\t') {
            line.split('\t')
                .map(str::trim)
                .take_while(|f| !f.starts_with('#'))
                .filter(|f| !f.is_empty())
                .collect()
        } else {
            strip_comment(line).split_whitespace().collect()
        };
        if fields.is_empty() {
            continue;
        }
        events.push(parse_fields(&fields).map_err(|msg| {
            AttachError::InvalidInput(format!("Invalid event at line {}: {msg}", i + 1))
        })?);
    }
    Ok(events)
}

fn strip_comment(line: &str) -> &str {
    line.char_indices()
        .find(|&(i, c)| c == '#' && line[..i].chars().next_back().is_none_or(char::is_whitespace))
        .map_or(line, |(i, _)| &line[..i])
}

fn parse_fields(fields: &[&str]) -> std::result::Result<HostEvent, String> {
    let (verb, args) = fields
        .split_first()
        .ok_or_else(|| "empty line".to_string())?;
    let pair = || match args {
        [source, destination] => Ok((PathBuf::from(*source), PathBuf::from(*destination))),
        _ => Err(format!("'{verb}' expects SOURCE and DESTINATION")),
    };
    let single = || match args {
        [path] => Ok(PathBuf::from(*path)),
        _ => Err(format!("'{verb}' expects a single PATH")),
    };

    match *verb {
        "copied" => pair().map(|(source, destination)| HostEvent::Copied { source, destination }),
        "moved" => pair().map(|(source, destination)| HostEvent::Moved { source, destination }),
        "linked" => pair().map(|(source, destination)| HostEvent::Linked { source, destination }),
        "hardlinked" => {
            pair().map(|(source, destination)| HostEvent::Hardlinked { source, destination })
        }
        "imported" if args.is_empty() => Ok(HostEvent::AlbumImported),
        "imported" => {
            pair().map(|(source, destination)| HostEvent::ItemImported { source, destination })
        }
        "album-imported" if args.is_empty() => Ok(HostEvent::AlbumImported),
        "album-imported" => Err("'album-imported' takes no arguments".to_string()),
        "removed" => single().map(|path| HostEvent::Removed { path, delete: true }),
        "dropped" => single().map(|path| HostEvent::Removed { path, delete: false }),
        other => Err(format!("unknown event '{other}'")),
    }
}
