//! Virtual filesystem service contract.

use std::collections::BTreeMap;

use super::error::{FsError, FsErrorKind, FsResult};
use super::types::{sort_entries, FsEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Initial payload for [`VirtualFsService::create_file`].
pub struct NewFile {
    /// Raw text or data URL.
    pub content: String,
    /// Explicit size in bytes; derived from `content` when `None`.
    pub size: Option<u64>,
}

impl NewFile {
    /// Text payload sized by its UTF-8 byte length.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            size: None,
        }
    }

    /// Payload with an explicit size, used for imported binary data.
    pub fn sized(content: impl Into<String>, size: u64) -> Self {
        Self {
            content: content.into(),
            size: Some(size),
        }
    }
}

/// Filesystem operations over a single virtual tree with a process-wide working directory.
///
/// Every path argument may be relative and is resolved against [`VirtualFsService::cwd`].
/// Operations that create or relocate a node return its resolved absolute path. Failures are
/// reported as [`FsError`] values and leave the tree unchanged.
pub trait VirtualFsService {
    /// Returns the current working directory.
    fn cwd(&self) -> String;

    /// Changes the working directory to an existing directory.
    fn set_cwd(&mut self, path: &str) -> FsResult<String>;

    /// Returns the shallow child map of a directory; `None` lists the working directory.
    fn list_directory(&self, path: Option<&str>) -> FsResult<BTreeMap<String, FsEntry>>;

    /// Describes a single node.
    fn stat(&self, path: &str) -> FsResult<FsEntry>;

    /// Creates an empty directory.
    fn create_directory(&mut self, path: &str) -> FsResult<String>;

    /// Creates a file, or refreshes the timestamp of an existing one.
    fn create_file(&mut self, path: &str, file: Option<NewFile>) -> FsResult<String>;

    /// Deletes a file or an empty directory.
    fn delete_item(&mut self, path: &str) -> FsResult<()>;

    /// Renames a node within its parent directory.
    fn rename_item(&mut self, path: &str, new_name: &str) -> FsResult<String>;

    /// Moves a node; an existing directory destination receives the node under its own name.
    fn move_item(&mut self, source: &str, destination: &str) -> FsResult<String>;

    /// Deep-copies a node, auto-renaming on collision.
    fn copy_item(&mut self, source: &str, destination: &str) -> FsResult<String>;

    /// Creates or overwrites a file with `content`.
    fn write_file(&mut self, path: &str, content: &str) -> FsResult<String>;

    /// Reads the content of a file.
    fn read_file(&self, path: &str) -> FsResult<String>;

    /// Lists a directory sorted directories-first, then by name.
    fn list_entries(&self, path: Option<&str>) -> FsResult<Vec<FsEntry>> {
        let mut entries = self
            .list_directory(path)?
            .into_values()
            .collect::<Vec<_>>();
        sort_entries(&mut entries);
        Ok(entries)
    }

    /// Returns `true` when `path` resolves to an existing node.
    fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op filesystem adapter for hosts without a tree and for baseline tests.
pub struct NoopVirtualFsService;

impl NoopVirtualFsService {
    fn unavailable<T>(op: &str) -> FsResult<T> {
        Err(FsError::new(
            FsErrorKind::NotFound,
            format!("{op}: filesystem unavailable"),
        ))
    }
}

impl VirtualFsService for NoopVirtualFsService {
    fn cwd(&self) -> String {
        super::path::ROOT_PATH.to_string()
    }

    fn set_cwd(&mut self, _path: &str) -> FsResult<String> {
        Self::unavailable("cd")
    }

    fn list_directory(&self, _path: Option<&str>) -> FsResult<BTreeMap<String, FsEntry>> {
        Self::unavailable("ls")
    }

    fn stat(&self, _path: &str) -> FsResult<FsEntry> {
        Self::unavailable("stat")
    }

    fn create_directory(&mut self, _path: &str) -> FsResult<String> {
        Self::unavailable("mkdir")
    }

    fn create_file(&mut self, _path: &str, _file: Option<NewFile>) -> FsResult<String> {
        Self::unavailable("touch")
    }

    fn delete_item(&mut self, _path: &str) -> FsResult<()> {
        Self::unavailable("delete")
    }

    fn rename_item(&mut self, _path: &str, _new_name: &str) -> FsResult<String> {
        Self::unavailable("rename")
    }

    fn move_item(&mut self, _source: &str, _destination: &str) -> FsResult<String> {
        Self::unavailable("mv")
    }

    fn copy_item(&mut self, _source: &str, _destination: &str) -> FsResult<String> {
        Self::unavailable("cp")
    }

    fn write_file(&mut self, _path: &str, _content: &str) -> FsResult<String> {
        Self::unavailable("write")
    }

    fn read_file(&self, _path: &str) -> FsResult<String> {
        Self::unavailable("cat")
    }
}
