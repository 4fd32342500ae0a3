//! Renaming a single file in place.
//!
//! The new name is a bare file name; the file never moves to another
//! directory. An existing file is never replaced.
//!
//! # Examples
//!
//! ```no_run
//! use buckutils::rename::rename;
//! use std::path::Path;
//!
//! # fn example() -> buckutils::Result<()> {
//! let renamed = rename(Path::new("scans/scan_0042.pdf"), "invoice-march")?;
//! assert_eq!(renamed, Path::new("scans/invoice-march.pdf"));
//! # Ok(())
//! # }
//! ```

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{BuckError, Result};

/// Windows `ERROR_SHARING_VIOLATION`.
const ERROR_SHARING_VIOLATION: i32 = 32;
/// Windows `ERROR_LOCK_VIOLATION`.
const ERROR_LOCK_VIOLATION: i32 = 33;

/// A file picked for renaming and the name proposed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTarget {
    source: PathBuf,
    new_name: Option<String>,
}

impl RenameTarget {
    /// Pick `source` for renaming.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            new_name: None,
        }
    }

    /// File being renamed.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Name proposed so far.
    pub fn new_name(&self) -> Option<&str> {
        self.new_name.as_deref()
    }

    /// Propose a new name, replacing any earlier proposal.
    pub fn propose(&mut self, new_name: impl Into<String>) {
        self.new_name = Some(new_name.into());
    }

    /// Where the file would end up.
    pub fn destination(&self) -> Result<PathBuf> {
        let name = self
            .new_name
            .as_deref()
            .ok_or_else(|| BuckError::invalid_name("", "no new name was given"))?;
        destination_for(&self.source, name)
    }

    /// Perform the rename and return the new path.
    pub fn apply(&self) -> Result<PathBuf> {
        let name = self
            .new_name
            .as_deref()
            .ok_or_else(|| BuckError::invalid_name("", "no new name was given"))?;
        rename(&self.source, name)
    }
}

/// Rename `source` to `new_name` within its directory.
///
/// If `new_name` has no extension the source's extension is kept. Renaming a
/// file to its current name does nothing.
///
/// # Errors
///
/// - [`BuckError::InvalidName`] if `new_name` is empty or not a bare file name
/// - [`BuckError::ReadError`] if `source` does not exist
/// - [`BuckError::NameConflict`] if the destination exists; both files are
///   left untouched
/// - [`BuckError::PermissionError`] if the file is locked or access is denied
pub fn rename(source: &Path, new_name: &str) -> Result<PathBuf> {
    let destination = destination_for(source, new_name)?;

    match source.try_exists() {
        Ok(true) => {}
        Ok(false) => return Err(BuckError::read_error(source, "file not found")),
        Err(err) => return Err(classify_rename_error(source, &destination, err)),
    }

    if destination == source {
        return Ok(destination);
    }

    let moved = if is_case_only_rename(source, &destination) {
        std::fs::rename(source, &destination)
    } else if std::fs::symlink_metadata(&destination).is_ok() {
        return Err(BuckError::name_conflict(&destination));
    } else {
        move_without_replacing(source, &destination)
    };
    moved.map_err(|err| classify_rename_error(source, &destination, err))?;

    tracing::debug!(
        from = %source.display(),
        to = %destination.display(),
        "renamed file"
    );
    Ok(destination)
}

/// Path `source` would have after being renamed to `new_name`.
pub fn destination_for(source: &Path, new_name: &str) -> Result<PathBuf> {
    let name = validate_name(new_name)?;

    let mut file_name = name.to_string();
    if Path::new(name).extension().is_none()
        && let Some(ext) = source.extension()
    {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }

    Ok(source.with_file_name(file_name))
}

fn validate_name(new_name: &str) -> Result<&str> {
    let name = new_name.trim();
    if name.is_empty() {
        return Err(BuckError::invalid_name(new_name, "name is empty"));
    }
    if name == "." || name == ".." {
        return Err(BuckError::invalid_name(new_name, "not a file name"));
    }
    if name.contains(['/', '\\']) {
        return Err(BuckError::invalid_name(
            new_name,
            "must be a file name, not a path",
        ));
    }
    if name.contains('\0') {
        return Err(BuckError::invalid_name(new_name, "contains a NUL character"));
    }
    Ok(name)
}

/// A rename that only changes letter case, on a file system that folds case.
///
/// The destination must be the very same file as the source, not a link to it.
fn is_case_only_rename(source: &Path, destination: &Path) -> bool {
    let (Some(from), Some(to)) = (source.file_name(), destination.file_name()) else {
        return false;
    };
    if from == to || from.to_string_lossy().to_lowercase() != to.to_string_lossy().to_lowercase() {
        return false;
    }

    match (
        std::fs::symlink_metadata(source),
        std::fs::symlink_metadata(destination),
    ) {
        (Ok(from), Ok(to)) => {
            !to.file_type().is_symlink() && same_inode(&from, &to, source, destination)
        }
        _ => false,
    }
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata, _: &Path, _: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_: &Metadata, _: &Metadata, source: &Path, destination: &Path) -> bool {
    match (source.canonicalize(), destination.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Link the new name first so an existing destination makes the call fail
/// with `AlreadyExists` instead of being replaced.
#[cfg(unix)]
fn move_without_replacing(source: &Path, destination: &Path) -> io::Result<()> {
    match std::fs::hard_link(source, destination) {
        Ok(()) => std::fs::remove_file(source).inspect_err(|_| {
            let _ = std::fs::remove_file(destination);
        }),
        Err(err) if err.kind() == io::ErrorKind::Unsupported => {
            if std::fs::symlink_metadata(destination).is_ok() {
                return Err(io::Error::from(io::ErrorKind::AlreadyExists));
            }
            std::fs::rename(source, destination)
        }
        Err(err) => Err(err),
    }
}

#[cfg(not(unix))]
fn move_without_replacing(source: &Path, destination: &Path) -> io::Result<()> {
    std::fs::rename(source, destination)
}

/// Map an OS error from a rename to the matching error kind.
pub fn classify_rename_error(source: &Path, destination: &Path, err: io::Error) -> BuckError {
    if matches!(
        err.raw_os_error(),
        Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
    ) && cfg!(windows)
    {
        return BuckError::PermissionError {
            path: source.to_path_buf(),
            source: err,
        };
    }

    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy => {
            BuckError::PermissionError {
                path: source.to_path_buf(),
                source: err,
            }
        }
        io::ErrorKind::NotFound => BuckError::read_error(source, err.to_string()),
        io::ErrorKind::AlreadyExists => BuckError::name_conflict(destination),
        _ => BuckError::write_error(destination, err),
    }
}
