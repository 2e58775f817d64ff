//! Config command - inspect or create the configuration file

use std::path::{Path, PathBuf};

use crate::AttachError;
use crate::cli::ConfigCommands;
use crate::config::AttachConfig;

type Result<T> = std::result::Result<T, AttachError>;

/// Resolve the configuration file location
///
/// # Errors
/// Returns `AttachError::ConfigError` if no explicit path is given and the
/// user config directory cannot be determined.
pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(AttachConfig::config_path()?),
    }
}

/// Execute a config subcommand
///
/// # Errors
/// Returns an error if the configuration cannot be loaded, rendered or written,
/// or if `init` would overwrite an existing file without `--force`.
pub fn execute(command: &ConfigCommands, explicit: Option<&Path>, quiet: bool) -> Result<()> {
    let path = config_file(explicit)?;
    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = AttachConfig::load_from(&path)?;
            config.compile()?;
            print!("{}", config.to_toml()?);
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                return Err(AttachError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            AttachConfig::starter().save_to(&path)?;
            if !quiet {
                println!("Configuration written to {}", path.display());
            }
        }
    }
    Ok(())
}
