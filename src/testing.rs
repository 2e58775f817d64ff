//! Testing utilities for attachfiles
//!
//! This module provides a `TestLibrary` fixture: a temporary directory with a
//! source folder (where primary files and their attachments start out) and a
//! destination folder (where they are copied or moved to).
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary source/destination layout removed on drop
pub struct TestLibrary {
    root: TempDir,
    source: PathBuf,
    destination: PathBuf,
}

impl TestLibrary {
    /// Create the fixture with empty `source/` and `destination/` folders
    ///
    /// # Panics
    /// Panics if the temporary directories cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let source = root.path().join("source");
        let destination = root.path().join("destination");
        fs::create_dir(&source).expect("Failed to create source dir");
        fs::create_dir(&destination).expect("Failed to create destination dir");
        Self {
            root,
            source,
            destination,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Create `rel` (with parent folders) under the source folder
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn source_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        let path = self.source.join(rel);
        create_test_file(&path).expect("Failed to create source file");
        path
    }

    /// Create `rel` (with parent folders) under the destination folder
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn destination_file(&self, rel: impl AsRef<Path>) -> PathBuf {
        let path = self.destination.join(rel);
        create_test_file(&path).expect("Failed to create destination file");
        path
    }

    /// Create an extra folder next to source and destination
    ///
    /// # Panics
    /// Panics if the folder cannot be created.
    pub fn dir(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Create a symlink named `name` in the source folder pointing at `target`
    ///
    /// # Panics
    /// Panics if the link cannot be created.
    #[cfg(unix)]
    pub fn source_symlink(&self, target: &Path, name: &str) -> PathBuf {
        let link = self.source.join(name);
        std::os::unix::fs::symlink(target, &link).expect("Failed to create symlink");
        link
    }
}

impl Default for TestLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test file with default content, creating parent folders
///
/// # Errors
/// Returns an `io::Error` if the file cannot be created or written.
pub fn create_test_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    create_test_file_with_content(path, b"test content")
}

/// Create a test file with custom content, creating parent folders
///
/// # Errors
/// Returns an `io::Error` if the file cannot be created or written.
pub fn create_test_file_with_content(path: impl AsRef<Path>, content: &[u8]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_layout() {
        let lib = TestLibrary::new();
        assert!(lib.source().is_dir());
        assert!(lib.destination().is_dir());
        assert!(lib.source().starts_with(lib.root()));
    }

    #[test]
    fn test_library_cleanup() {
        let root = {
            let lib = TestLibrary::new();
            lib.source_file("a.jpg");
            lib.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_source_file_creates_parents() {
        let lib = TestLibrary::new();
        let path = lib.source_file("deep/er/file.txt");
        assert_eq!(fs::read_to_string(path).unwrap(), "test content");
    }

    #[test]
    fn test_create_test_file_with_custom_content() {
        let lib = TestLibrary::new();
        let path = lib.root().join("custom.bin");
        create_test_file_with_content(&path, b"custom test data").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"custom test data");
    }
}
