//! Single event command - report one primary file operation

use colored::Colorize;

use crate::AttachError;
use crate::events::{AttachFiles, EventReport, HostEvent, IgnoreReason};

type Result<T> = std::result::Result<T, AttachError>;

/// Handle one event and print what happened
///
/// # Errors
/// Returns the `AttachError` if the attach request could not run at all
/// (for example, the source directory is gone).
pub fn execute(plugin: &mut AttachFiles, event: &HostEvent, quiet: bool) -> Result<()> {
    match event.dispatch(plugin) {
        EventReport::Failed(e) => Err(e),
        report => {
            if !quiet {
                print_report(&report);
            }
            Ok(())
        }
    }
}

/// Human-readable rendering of an event report
pub fn print_report(report: &EventReport) {
    match report {
        EventReport::SessionReset => println!("{}", "Import session reset.".cyan()),
        EventReport::Attached(result) => result.print(),
        EventReport::Removed(result) => result.print(),
        EventReport::Ignored(IgnoreReason::KeptOnDisk) => {
            println!("{}", "File kept on disk, attachments left alone.".yellow());
        }
        EventReport::Ignored(IgnoreReason::RemovalDisabled) => {
            println!("{}", "Removal of attachments is disabled.".yellow());
        }
        EventReport::Failed(e) => eprintln!("{} {e}", "✗".red()),
    }
}
