//! The filesystem capability consumed from the host platform.
//!
//! Everything the application does to the disk goes through the
//! [`FileSystemAccess`] trait, which allows a mock implementation during
//! tests, avoiding the need to manipulate real directory trees for every
//! traversal scenario.

use super::{CoreError, FsEntry};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Defines the minimal set of filesystem operations the application needs:
/// list the children of a directory, create, delete, and rename.
pub trait FileSystemAccess: Send + Sync {
    /// Lists the immediate children of `directory` as absolute paths.
    ///
    /// Ordering is whatever the platform reports; it is stable within a
    /// single call but callers must not assume any sort order.
    fn list_children(&self, directory: &Path) -> Result<Vec<FsEntry>, CoreError>;

    /// Creates a new directory named `name` inside `parent`.
    fn create_directory(&self, parent: &Path, name: &str) -> Result<PathBuf, CoreError>;

    /// Creates a new empty file named `name` inside `parent`.
    fn create_file(&self, parent: &Path, name: &str) -> Result<PathBuf, CoreError>;

    /// Deletes a file or an empty directory. Non-recursive: deleting a
    /// directory that still has children fails with [`CoreError::NotEmpty`].
    fn delete(&self, path: &Path) -> Result<(), CoreError>;

    /// Renames `path` to `new_name` within its parent directory.
    /// Never overwrites an existing target.
    fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, CoreError>;
}

/// The production implementation backed by `std::fs`.
pub struct OsFileSystem;

impl FileSystemAccess for OsFileSystem {
    fn list_children(&self, directory: &Path) -> Result<Vec<FsEntry>, CoreError> {
        let read_dir =
            std::fs::read_dir(directory).map_err(|e| CoreError::from_io(e, directory))?;

        let mut entries = Vec::new();
        for entry in read_dir.filter_map(Result::ok) {
            // Symlinks are reported as plain entries and never descended into.
            let is_directory = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(FsEntry {
                path: entry.path(),
                is_directory,
            });
        }
        Ok(entries)
    }

    fn create_directory(&self, parent: &Path, name: &str) -> Result<PathBuf, CoreError> {
        let path = parent.join(name);
        std::fs::create_dir(&path).map_err(|e| CoreError::from_io(e, &path))?;
        Ok(path)
    }

    fn create_file(&self, parent: &Path, name: &str) -> Result<PathBuf, CoreError> {
        let path = parent.join(name);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| CoreError::from_io(e, &path))?;
        Ok(path)
    }

    fn delete(&self, path: &Path) -> Result<(), CoreError> {
        let metadata =
            std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(e, path))?;
        if metadata.is_dir() {
            std::fs::remove_dir(path).map_err(|e| CoreError::from_io(e, path))
        } else {
            std::fs::remove_file(path).map_err(|e| CoreError::from_io(e, path))
        }
    }

    fn rename(&self, path: &Path, new_name: &str) -> Result<PathBuf, CoreError> {
        let parent = path
            .parent()
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))?;
        let target = parent.join(new_name);
        // std::fs::rename silently replaces an existing target on Unix.
        if target.exists() {
            return Err(CoreError::AlreadyExists(target));
        }
        std::fs::rename(path, &target).map_err(|e| CoreError::from_io(e, path))?;
        Ok(target)
    }
}
