//! Directory-aware filesystem primitives used when mirroring attachments.
//!
//! None of these follow symbolic links: a symlinked attachment is copied as a
//! link, moved as a link and removed as a link. Targets are never overwritten.
//!
//! A top-level link with a relative target is re-pointed when it lands in
//! another directory, so it keeps resolving to the same entry. Relative links
//! nested inside a copied directory keep their text; they only stay valid
//! while they point inside that directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Copy `src` to `tgt`, recursing into real directories.
///
/// # Errors
/// Returns `AlreadyExists` if `tgt` is present, or any I/O error from reading
/// `src` or writing `tgt`. A failed directory copy may leave a partial tree.
/// Copying an entry onto itself is a no-op.
pub fn copy_file_or_directory(src: &Path, tgt: &Path) -> io::Result<()> {
    if same_entry(src, tgt) {
        return Ok(());
    }
    ensure_vacant(tgt)?;
    let file_type = fs::symlink_metadata(src)?.file_type();
    if file_type.is_symlink() {
        create_symlink(src, &relocated_link_target(src, tgt)?, tgt)
    } else if file_type.is_dir() {
        copy_directory(src, tgt)
    } else {
        fs::copy(src, tgt).map(|_| ())
    }
}

/// Move `src` to `tgt`, falling back to copy + remove across devices.
///
/// # Errors
/// Returns `AlreadyExists` if `tgt` is present, or any I/O error from the
/// rename or the fallback copy/remove. Moving an entry onto itself is a no-op.
pub fn move_file_or_directory(src: &Path, tgt: &Path) -> io::Result<()> {
    if same_entry(src, tgt) {
        return Ok(());
    }
    ensure_vacant(tgt)?;
    if fs::symlink_metadata(src)?.file_type().is_symlink() {
        let link_target = relocated_link_target(src, tgt)?;
        if link_target != fs::read_link(src)? {
            create_symlink(src, &link_target, tgt)?;
            return remove_symlink(src);
        }
    }
    match fs::rename(src, tgt) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                "{} and {} are on different devices, copying instead",
                src.display(),
                tgt.display()
            );
            copy_file_or_directory(src, tgt)?;
            remove_file_or_directory(src)
        }
        Err(e) => Err(e),
    }
}

/// Delete `path`: real directories recursively, everything else (including a
/// symlink to a directory) is unlinked.
///
/// # Errors
/// Returns any I/O error from inspecting or deleting `path`.
pub fn remove_file_or_directory(path: &Path) -> io::Result<()> {
    let file_type = fs::symlink_metadata(path)?.file_type();
    if file_type.is_dir() {
        fs::remove_dir_all(path)
    } else if file_type.is_symlink() {
        remove_symlink(path)
    } else {
        fs::remove_file(path)
    }
}

/// Whether `src` and `tgt` name the same directory entry. Leaves are compared
/// by name so a symlink is never resolved.
fn same_entry(src: &Path, tgt: &Path) -> bool {
    if src.file_name() != tgt.file_name() {
        return false;
    }
    match (canonical_parent(src), canonical_parent(tgt)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn canonical_parent(path: &Path) -> io::Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::canonicalize(parent)
}

/// Target text for a copy of the link `src` placed at `tgt`. Relative targets
/// are rebased on the source directory when the link changes directory.
fn relocated_link_target(src: &Path, tgt: &Path) -> io::Result<PathBuf> {
    let link_target = fs::read_link(src)?;
    if link_target.is_absolute() {
        return Ok(link_target);
    }
    let src_parent = canonical_parent(src)?;
    match canonical_parent(tgt) {
        Ok(tgt_parent) if tgt_parent == src_parent => Ok(link_target),
        _ => Ok(src_parent.join(link_target)),
    }
}

fn ensure_vacant(tgt: &Path) -> io::Result<()> {
    match fs::symlink_metadata(tgt) {
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", tgt.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn copy_directory(src: &Path, tgt: &Path) -> io::Result<()> {
    fs::create_dir(tgt)?;
    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let rel_path = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let new_path = tgt.join(rel_path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&new_path)?;
        } else if file_type.is_symlink() {
            create_symlink(entry.path(), &fs::read_link(entry.path())?, &new_path)?;
        } else {
            fs::copy(entry.path(), &new_path)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn create_symlink(_src: &Path, link_target: &Path, tgt: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(link_target, tgt)
}

#[cfg(windows)]
fn create_symlink(src: &Path, link_target: &Path, tgt: &Path) -> io::Result<()> {
    if fs::metadata(src).is_ok_and(|m| m.is_dir()) {
        std::os::windows::fs::symlink_dir(link_target, tgt)
    } else {
        std::os::windows::fs::symlink_file(link_target, tgt)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(src: &Path, _link_target: &Path, _tgt: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot copy symlink {}", src.display()),
    ))
}

#[cfg(windows)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    // Directory links are directories as far as the Windows API is concerned
    if fs::metadata(path).is_ok_and(|m| m.is_dir()) {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(not(windows))]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}
