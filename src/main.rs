//! Attachfiles CLI application entry point
//!
//! Stands in for a host library: every invocation reports one lifecycle event
//! of a primary file (or replays a list of them) and the matching attachment
//! files follow.
//!
//! # Usage
//!
//! ```bash
//! # A track was copied into the library; copy artwork and logs along
//! attachfiles copied ~/incoming/album/01.flac ~/music/Artist/Album/01.flac
//!
//! # A track was deleted; delete its attachments if nothing else is left
//! attachfiles removed ~/music/Artist/Album/01.flac
//!
//! # Replay an import run in a single session
//! attachfiles replay events.txt
//!
//! # Create a starter configuration
//! attachfiles config init
//! ```
//!
//! # Configuration
//!
//! Patterns and options are read from the user's config directory
//! (`~/.config/attachfiles/config.toml` on Linux) or from `--config PATH`.

use attachfiles::{
    AttachError,
    cli::{Cli, Commands},
    commands,
    config::AttachConfig,
    events::AttachFiles,
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, AttachError>;

/// Build the attachment handler from the configuration file
///
/// # Errors
///
/// Returns `AttachError` if the file is missing or invalid, or a pattern does
/// not compile.
fn load_plugin(cli: &Cli) -> Result<AttachFiles> {
    let path = commands::config::config_file(cli.config.as_deref())?;
    let settings = AttachConfig::load_from(&path)?.compile()?;
    tracing::debug!(
        "Loaded {} attachment pattern(s) from {}",
        settings.patterns.len(),
        path.display()
    );
    Ok(AttachFiles::new(settings))
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Config { command } => {
            commands::config(command, cli.config.as_deref(), cli.quiet)?;
        }
        Commands::Replay { events } => {
            let mut plugin = load_plugin(&cli)?;
            commands::replay(&mut plugin, events, cli.quiet)?;
        }
        command => {
            let event = command
                .to_event()
                .ok_or_else(|| AttachError::InvalidInput("Unsupported command".into()))?;
            let mut plugin = load_plugin(&cli)?;
            commands::event(&mut plugin, &event, cli.quiet)?;
        }
    }

    Ok(())
}
