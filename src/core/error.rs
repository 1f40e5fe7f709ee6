//! Defines the custom error type for the `core` module.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates everything that can go wrong while listing,
/// searching, or mutating the filesystem. Variants mirror the outcomes the
/// host platform can report for the operations this application performs.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested path does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The operating system refused access to the path.
    #[error("Access denied: {0}")]
    AccessDenied(PathBuf),

    /// A create or rename target already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// A non-recursive delete was attempted on a non-empty directory.
    #[error("Directory is not empty: {0}")]
    NotEmpty(PathBuf),

    /// Represents any other I/O error from filesystem operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] io::Error, PathBuf),

    /// Represents a user-initiated cancellation of an operation.
    #[error("Operation was cancelled")]
    Cancelled,
}

impl CoreError {
    /// Translates an `io::Error` for `path` into the matching variant.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => CoreError::AccessDenied(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => CoreError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::NotADirectory => CoreError::NotADirectory(path.to_path_buf()),
            io::ErrorKind::DirectoryNotEmpty => CoreError::NotEmpty(path.to_path_buf()),
            _ => CoreError::Io(err, path.to_path_buf()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_kinds_map_to_taxonomy_variants() {
        let path = Path::new("/some/where");

        let err = CoreError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(err, CoreError::NotFound(_)));

        let err = CoreError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, CoreError::AccessDenied(_)));

        let err = CoreError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), path);
        assert!(matches!(err, CoreError::AlreadyExists(_)));
    }

    #[test]
    fn unmapped_kinds_fall_back_to_io() {
        let err = CoreError::from_io(
            io::Error::from(io::ErrorKind::Interrupted),
            Path::new("/tmp/x"),
        );
        assert!(matches!(err, CoreError::Io(_, _)));
    }
}
