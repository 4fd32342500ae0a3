//! Error types for buckutils.
//!
//! Every catalog, combine and rename operation reports failures through
//! [`BuckError`]. Errors are local to the operation that raised them: a
//! malformed PDF fails one `add`, never the session.
//!
//! # Error Categories
//!
//! - **Catalog errors**: [`BuckError::InvalidFile`], [`BuckError::IndexOutOfRange`]
//! - **Combine errors**: [`BuckError::ReadError`], [`BuckError::WriteError`]
//! - **Rename errors**: [`BuckError::NameConflict`], [`BuckError::PermissionError`]

use std::io;
use std::path::PathBuf;

/// Result type alias for buckutils operations.
pub type Result<T> = std::result::Result<T, BuckError>;

/// Main error type for buckutils operations.
#[derive(Debug, thiserror::Error)]
pub enum BuckError {
    /// The file is unreadable or is not a usable PDF.
    #[error("Not a usable PDF file: {}\n  Reason: {reason}", .path.display())]
    InvalidFile {
        /// Path that was rejected.
        path: PathBuf,
        /// Why the file was rejected.
        reason: String,
    },

    /// An index does not address an entry of the catalog.
    #[error("No item at position {} (the list has {len} item(s))", .index + 1)]
    IndexOutOfRange {
        /// Zero-based index that was requested.
        index: usize,
        /// Number of entries at the time of the request.
        len: usize,
    },

    /// A source file disappeared or changed between adding it and using it.
    #[error("Could not read source file: {}\n  Reason: {reason}", .path.display())]
    ReadError {
        /// Source that could not be read.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The output path could not be written.
    #[error("Could not write output file: {}\n  Reason: {source}", .path.display())]
    WriteError {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A rename would replace an existing file.
    #[error("A file named {} already exists", .path.display())]
    NameConflict {
        /// The destination that already exists.
        path: PathBuf,
    },

    /// The operating system refused access, usually because the file is in use.
    #[error(
        "Permission denied for {}\n  Hint: close any program that has the file open and try again",
        .path.display()
    )]
    PermissionError {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Combine was requested with nothing in the catalog.
    #[error("Nothing to combine: add some PDF files first")]
    NothingToCombine,

    /// A proposed file name cannot be used.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidName {
        /// Name that was proposed.
        name: String,
        /// Why it was refused.
        reason: String,
    },

    /// Output file already exists and overwriting is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for BuckError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for BuckError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl BuckError {
    /// Create an InvalidFile error.
    pub fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a ReadError.
    pub fn read_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ReadError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a WriteError.
    pub fn write_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Create a NameConflict error.
    pub fn name_conflict(path: impl Into<PathBuf>) -> Self {
        Self::NameConflict { path: path.into() }
    }

    /// Create an InvalidName error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the user can resolve this by picking a different file,
    /// position or name and simply trying again.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            Self::InvalidFile { .. }
                | Self::IndexOutOfRange { .. }
                | Self::NameConflict { .. }
                | Self::InvalidName { .. }
                | Self::OutputExists { .. }
                | Self::NothingToCombine
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidFile { .. } => 3,
            Self::IndexOutOfRange { .. } => 1,
            Self::ReadError { .. } => 2,
            Self::WriteError { .. } => 5,
            Self::NameConflict { .. } => 4,
            Self::PermissionError { .. } => 5,
            Self::NothingToCombine => 1,
            Self::InvalidName { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
