//! Filesystem error taxonomy.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Classification of a failed filesystem operation.
pub enum FsErrorKind {
    /// The path could not be resolved or names the root where a child is required.
    InvalidPath,
    /// The path, or its parent, does not exist.
    NotFound,
    /// A directory was required.
    NotADirectory,
    /// A file was required.
    NotAFile,
    /// The destination name is already taken.
    AlreadyExists,
    /// The directory still has children.
    NotEmpty,
    /// A directory would be moved or copied into its own subtree.
    SelfContainment,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// Recoverable filesystem failure carrying a user-facing message.
///
/// Messages are prefixed with the command that failed (`mkdir:`, `cp:` ...) so terminal and
/// explorer front ends can surface them verbatim.
pub struct FsError {
    /// Error classification.
    pub kind: FsErrorKind,
    /// User-facing message.
    pub message: String,
}

impl FsError {
    /// Creates an error of `kind`.
    pub fn new(kind: FsErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for [`FsErrorKind::InvalidPath`].
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new(FsErrorKind::InvalidPath, message)
    }

    /// Shorthand for [`FsErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FsErrorKind::NotFound, message)
    }

    /// Shorthand for [`FsErrorKind::AlreadyExists`].
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(FsErrorKind::AlreadyExists, message)
    }
}

/// Result alias for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;
