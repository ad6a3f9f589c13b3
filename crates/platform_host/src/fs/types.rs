//! Filesystem data types shared across host contracts and implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Child map of a directory node, keyed by entry name.
pub type DirectoryContent = BTreeMap<String, FsNode>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// A node of the virtual tree.
///
/// Directories own their children outright, so the tree can never contain a shared node or a
/// cycle. File content is raw text or a `data:` URL for binary payloads.
pub enum FsNode {
    /// Directory node.
    Directory {
        /// Children keyed by name.
        #[serde(default)]
        content: DirectoryContent,
        /// Cosmetic size; directories are not sized recursively.
        #[serde(default)]
        size: u64,
        /// Last-modified time in unix milliseconds.
        last_modified_unix_ms: u64,
    },
    /// File node.
    File {
        /// Raw text content or data URL.
        #[serde(default)]
        content: String,
        /// Size in bytes.
        #[serde(default)]
        size: u64,
        /// Last-modified time in unix milliseconds.
        last_modified_unix_ms: u64,
    },
}

impl FsNode {
    /// Creates an empty directory stamped with `last_modified_unix_ms`.
    pub fn directory(last_modified_unix_ms: u64) -> Self {
        Self::Directory {
            content: DirectoryContent::new(),
            size: 0,
            last_modified_unix_ms,
        }
    }

    /// Creates a file node with an explicit size.
    pub fn file(content: impl Into<String>, size: u64, last_modified_unix_ms: u64) -> Self {
        Self::File {
            content: content.into(),
            size,
            last_modified_unix_ms,
        }
    }

    /// Creates a file node sized by the UTF-8 byte length of `content`.
    pub fn text_file(content: impl Into<String>, last_modified_unix_ms: u64) -> Self {
        let content = content.into();
        let size = content.len() as u64;
        Self::file(content, size, last_modified_unix_ms)
    }

    /// Returns the node kind.
    pub fn kind(&self) -> FsEntryKind {
        match self {
            Self::Directory { .. } => FsEntryKind::Directory,
            Self::File { .. } => FsEntryKind::File,
        }
    }

    /// Returns `true` for directory nodes.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Returns `true` for file nodes.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the recorded size in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::Directory { size, .. } | Self::File { size, .. } => *size,
        }
    }

    /// Returns the last-modified time in unix milliseconds.
    pub fn last_modified_unix_ms(&self) -> u64 {
        match self {
            Self::Directory {
                last_modified_unix_ms,
                ..
            }
            | Self::File {
                last_modified_unix_ms,
                ..
            } => *last_modified_unix_ms,
        }
    }

    /// Overwrites the last-modified time.
    pub fn touch(&mut self, at_unix_ms: u64) {
        match self {
            Self::Directory {
                last_modified_unix_ms,
                ..
            }
            | Self::File {
                last_modified_unix_ms,
                ..
            } => *last_modified_unix_ms = at_unix_ms,
        }
    }

    /// Returns the child map for directories.
    pub fn children(&self) -> Option<&DirectoryContent> {
        match self {
            Self::Directory { content, .. } => Some(content),
            Self::File { .. } => None,
        }
    }

    /// Returns the mutable child map for directories.
    pub fn children_mut(&mut self) -> Option<&mut DirectoryContent> {
        match self {
            Self::Directory { content, .. } => Some(content),
            Self::File { .. } => None,
        }
    }

    /// Returns file content, or `None` for directories.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::File { content, .. } => Some(content),
            Self::Directory { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Directory entry kind.
pub enum FsEntryKind {
    /// File entry.
    File,
    /// Directory entry.
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Directory entry or stat result returned by listing operations.
pub struct FsEntry {
    /// Base name of the entry (`/` for the root).
    pub name: String,
    /// Full normalized path.
    pub path: String,
    /// File or directory kind.
    pub kind: FsEntryKind,
    /// File size in bytes (files only).
    pub size: Option<u64>,
    /// Last-modified time in unix milliseconds.
    pub modified_at_unix_ms: u64,
}

impl FsEntry {
    /// Describes `node`, which lives at `path` under `name`.
    pub fn from_node(name: impl Into<String>, path: impl Into<String>, node: &FsNode) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: node.kind(),
            size: node.is_file().then(|| node.size()),
            modified_at_unix_ms: node.last_modified_unix_ms(),
        }
    }

    /// Returns `true` for directory entries.
    pub fn is_directory(&self) -> bool {
        self.kind == FsEntryKind::Directory
    }
}

/// Sorts entries with directories first, then by case-sensitive name.
pub fn sort_entries(entries: &mut [FsEntry]) {
    entries.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name.cmp(&b.name))
    });
}
