//! Configuration module for attachfiles
//!
//! The configuration is read once at startup and never changes afterwards.
//! It is stored in the user's config directory as TOML:
//!
//! ```toml
//! patterns = ["*.jpg", "*.log", "*.cue"]
//! allow_multiple_copies = false
//! allow_remove = true
//! on_failure = "abort"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::patterns::{PatternError, PatternSet};

/// Patterns written by `config init`
const STARTER_PATTERNS: &[&str] = &["*.jpg", "*.jpeg", "*.png", "*.log", "*.cue"];

/// What to do when mirroring a single attachment fails
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failed attachment; the directory is not marked as
    /// processed, items already handled stay handled
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining attachments
    Continue,
}

const fn default_allow_remove() -> bool {
    true
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AttachConfig {
    /// Glob patterns selecting attachment names
    pub patterns: Vec<String>,

    /// Key the session on (source, destination) instead of source alone
    #[serde(default)]
    pub allow_multiple_copies: bool,

    /// Mirror deletion of a primary file onto its attachments
    #[serde(default = "default_allow_remove")]
    pub allow_remove: bool,

    /// Behaviour on a failed copy/move/remove of one attachment
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

impl AttachConfig {
    /// Configuration with the given patterns and default options
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            allow_multiple_copies: false,
            allow_remove: default_allow_remove(),
            on_failure: FailurePolicy::default(),
        }
    }

    /// Configuration written by `config init`
    #[must_use]
    pub fn starter() -> Self {
        Self::new(STARTER_PATTERNS.iter().copied())
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("attachfiles").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read or
    /// does not describe a valid configuration.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file does not exist, cannot be read or
    /// does not describe a valid configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Message(format!(
                "Config file not found at {} (run `attachfiles config init` to create one)",
                path.display()
            )));
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid TOML or misses required keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    /// Save configuration to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        fs::write(path, self.to_toml()?)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the patterns and freeze the configuration
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the pattern list is empty or a pattern is invalid.
    pub fn compile(&self) -> Result<AttachSettings, PatternError> {
        Ok(AttachSettings {
            patterns: PatternSet::new(&self.patterns)?,
            allow_multiple_copies: self.allow_multiple_copies,
            allow_remove: self.allow_remove,
            on_failure: self.on_failure,
        })
    }
}

/// Validated, immutable configuration used by the resolver
#[derive(Debug, Clone)]
pub struct AttachSettings {
    pub patterns: PatternSet,
    pub allow_multiple_copies: bool,
    pub allow_remove: bool,
    pub on_failure: FailurePolicy,
}

impl AttachSettings {
    /// Settings with the given patterns and default options
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the pattern list is empty or a pattern is invalid.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttachConfig::new(patterns).compile()
    }

    #[must_use]
    pub const fn allow_multiple_copies(mut self, v: bool) -> Self {
        self.allow_multiple_copies = v;
        self
    }

    #[must_use]
    pub const fn allow_remove(mut self, v: bool) -> Self {
        self.allow_remove = v;
        self
    }

    #[must_use]
    pub const fn on_failure(mut self, v: FailurePolicy) -> Self {
        self.on_failure = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_applied() {
        let config = AttachConfig::from_toml_str(r#"patterns = ["*.jpg"]"#).unwrap();
        assert_eq!(config.patterns, vec!["*.jpg".to_string()]);
        assert!(!config.allow_multiple_copies);
        assert!(config.allow_remove);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_all_options() {
        let config = AttachConfig::from_toml_str(
            r#"
            patterns = ["*.jpg", "*.log"]
            allow_multiple_copies = true
            allow_remove = false
            on_failure = "continue"
            "#,
        )
        .unwrap();
        assert_eq!(config.patterns.len(), 2);
        assert!(config.allow_multiple_copies);
        assert!(!config.allow_remove);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
    }

    #[test]
    fn test_patterns_are_required() {
        assert!(AttachConfig::from_toml_str("allow_remove = true").is_err());
    }

    #[test]
    fn test_compile_rejects_empty_patterns() {
        let config = AttachConfig::new(Vec::<String>::new());
        assert!(matches!(config.compile(), Err(PatternError::NoPatterns)));
    }

    #[test]
    fn test_compile_rejects_blank_pattern() {
        let config = AttachConfig::new(["*.jpg", ""]);
        assert!(matches!(config.compile(), Err(PatternError::InvalidEmpty)));
    }

    #[test]
    fn test_compile_accepts_shell_only_glob_forms() {
        let settings = AttachConfig::new(["cover**.jpg", "[oops"]).compile().unwrap();
        assert_eq!(settings.patterns.len(), 2);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let mut config = AttachConfig::starter();
        config.allow_multiple_copies = true;

        config.save_to(&path).unwrap();
        let loaded = AttachConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        let err = AttachConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_settings_builder() {
        let settings = AttachSettings::with_patterns(["*.png"])
            .unwrap()
            .allow_multiple_copies(true)
            .allow_remove(false)
            .on_failure(FailurePolicy::Continue);
        assert!(settings.allow_multiple_copies);
        assert!(!settings.allow_remove);
        assert_eq!(settings.on_failure, FailurePolicy::Continue);
        assert_eq!(settings.patterns.len(), 1);
    }
}
