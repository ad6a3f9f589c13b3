//! The filesystem engine: a single owned tree plus the working directory.

use std::collections::BTreeMap;

use platform_host::fs::path::{
    file_name, is_within, join_path, resolve_path, split_parent, ROOT_PATH,
};
use platform_host::{
    next_monotonic_timestamp_ms, FsEntry, FsError, FsErrorKind, FsNode, FsResult, NewFile,
    VirtualFsService,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::lookup::{get_dir, get_dir_mut, get_node};
use crate::naming::unique_copy_name;
use crate::seed::{seed_tree, SEED_CWD};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Virtual filesystem with a working directory.
///
/// Mutations borrow the tree exclusively and validate every precondition before their first
/// write. `revision` increases on every successful mutation, including `set_cwd`, and is not
/// persisted.
pub struct VirtualFs {
    root: FsNode,
    cwd: String,
    #[serde(skip)]
    revision: u64,
}

/// Where a move or copy lands once the destination argument has been classified.
enum Destination {
    /// The destination names an existing directory; the node keeps its own name inside it.
    IntoDirectory(String),
    /// The destination does not exist; its last segment becomes the new name.
    Renamed { parent: String, name: String },
}

/// Why a destination argument cannot receive a node.
enum DestinationError {
    /// The destination exists and is a file.
    ExistingFile,
    /// The parent of a new destination name is missing or is a file.
    MissingParent(FsErrorKind),
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::seeded()
    }
}

impl VirtualFs {
    /// Creates an empty tree with the working directory at `/`.
    pub fn empty() -> Self {
        Self {
            root: FsNode::directory(next_monotonic_timestamp_ms()),
            cwd: ROOT_PATH.to_string(),
            revision: 0,
        }
    }

    /// Creates the first-boot tree with the working directory at `/home`.
    pub fn seeded() -> Self {
        Self {
            root: seed_tree(),
            cwd: SEED_CWD.to_string(),
            revision: 0,
        }
    }

    /// Rebuilds an engine from persisted parts.
    ///
    /// A non-directory root is replaced by an empty directory, and a working directory that no
    /// longer names a directory falls back to `/`.
    pub fn from_parts(root: FsNode, cwd: impl Into<String>) -> Self {
        let root = if root.is_directory() {
            root
        } else {
            warn!("persisted filesystem root is not a directory; starting empty");
            FsNode::directory(next_monotonic_timestamp_ms())
        };
        let cwd = cwd.into();
        let cwd = match resolve_path(&cwd, ROOT_PATH) {
            Some(path) if get_dir(&root, &path).is_some() => path,
            _ => {
                warn!(cwd = %cwd, "persisted working directory is missing; using /");
                ROOT_PATH.to_string()
            }
        };
        Self {
            root,
            cwd,
            revision: 0,
        }
    }

    /// Returns the root directory node.
    pub fn root(&self) -> &FsNode {
        &self.root
    }

    /// Consumes the engine, returning the tree and working directory.
    pub fn into_parts(self) -> (FsNode, String) {
        (self.root, self.cwd)
    }

    /// Returns the mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Resolves `raw` against the working directory.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        resolve_path(raw, &self.cwd)
    }

    /// Returns the node at `raw`, resolved against the working directory.
    pub fn node(&self, raw: &str) -> Option<&FsNode> {
        get_node(&self.root, self.resolve(raw).as_deref())
    }

    /// Returns `true` when `raw` names an existing directory.
    pub fn is_directory(&self, raw: &str) -> bool {
        self.node(raw).is_some_and(FsNode::is_directory)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Error kind for a parent path that failed the directory check.
    fn parent_error_kind(&self, parent: &str) -> FsErrorKind {
        if get_node(&self.root, Some(parent)).is_some() {
            FsErrorKind::NotADirectory
        } else {
            FsErrorKind::NotFound
        }
    }

    fn classify_destination(
        &self,
        destination: &str,
    ) -> Result<Destination, DestinationError> {
        match get_node(&self.root, Some(destination)) {
            Some(node) if node.is_directory() => {
                Ok(Destination::IntoDirectory(destination.to_string()))
            }
            Some(_) => Err(DestinationError::ExistingFile),
            None => {
                let (parent, name) = split_parent(destination)
                    .ok_or(DestinationError::MissingParent(FsErrorKind::NotFound))?;
                if get_dir(&self.root, &parent).is_none() {
                    return Err(DestinationError::MissingParent(
                        self.parent_error_kind(&parent),
                    ));
                }
                Ok(Destination::Renamed {
                    parent,
                    name: name.to_string(),
                })
            }
        }
    }

    /// Keeps the working directory valid after the subtree at `from` moved to `to`.
    fn rebase_cwd(&mut self, from: &str, to: &str) {
        if self.cwd == from || is_within(&self.cwd, from) {
            let rebased = format!("{to}{}", &self.cwd[from.len()..]);
            debug!(from = %self.cwd, to = %rebased, "working directory followed its subtree");
            self.cwd = rebased;
        }
    }

    fn list_at(&self, path: &str) -> Option<BTreeMap<String, FsEntry>> {
        let children = get_dir(&self.root, path)?;
        Some(
            children
                .iter()
                .map(|(name, node)| {
                    (
                        name.clone(),
                        FsEntry::from_node(name.clone(), join_path(path, name), node),
                    )
                })
                .collect(),
        )
    }
}

impl VirtualFsService for VirtualFs {
    fn cwd(&self) -> String {
        self.cwd.clone()
    }

    fn set_cwd(&mut self, raw: &str) -> FsResult<String> {
        let path = self
            .resolve(raw)
            .ok_or_else(|| FsError::invalid_path(format!("cd: invalid path: {raw}")))?;
        match get_node(&self.root, Some(&path)) {
            Some(node) if node.is_directory() => {
                self.cwd = path.clone();
                self.bump();
                Ok(path)
            }
            found => Err(FsError::new(
                if found.is_some() {
                    FsErrorKind::NotADirectory
                } else {
                    FsErrorKind::NotFound
                },
                format!("cd: '{raw}': Not a directory or not found"),
            )),
        }
    }

    fn list_directory(&self, raw: Option<&str>) -> FsResult<BTreeMap<String, FsEntry>> {
        let raw = raw.unwrap_or_default();
        let message = || format!("ls: cannot access '{raw}': No such file or directory");
        let path = self
            .resolve(if raw.is_empty() { "." } else { raw })
            .ok_or_else(|| FsError::invalid_path(message()))?;
        self.list_at(&path).ok_or_else(|| {
            let kind = if get_node(&self.root, Some(&path)).is_some() {
                FsErrorKind::NotADirectory
            } else {
                FsErrorKind::NotFound
            };
            FsError::new(kind, message())
        })
    }

    fn stat(&self, raw: &str) -> FsResult<FsEntry> {
        let path = self
            .resolve(raw)
            .ok_or_else(|| FsError::invalid_path(format!("stat: invalid path: {raw}")))?;
        let node = get_node(&self.root, Some(&path)).ok_or_else(|| {
            FsError::not_found(format!(
                "stat: cannot stat '{raw}': No such file or directory"
            ))
        })?;
        let name = file_name(&path).unwrap_or(ROOT_PATH).to_string();
        Ok(FsEntry::from_node(name, path, node))
    }

    fn create_directory(&mut self, raw: &str) -> FsResult<String> {
        let path = self
            .resolve(raw)
            .filter(|path| path != ROOT_PATH)
            .ok_or_else(|| FsError::invalid_path(format!("mkdir: invalid path: {raw}")))?;
        let Some((parent, name)) = split_parent(&path) else {
            return Err(FsError::invalid_path(format!("mkdir: invalid path: {raw}")));
        };
        let kind = self.parent_error_kind(&parent);
        let Some(children) = get_dir_mut(&mut self.root, &parent) else {
            return Err(FsError::new(
                kind,
                format!("mkdir: cannot create directory '{raw}': Parent directory does not exist"),
            ));
        };
        if children.contains_key(name) {
            return Err(FsError::already_exists(format!(
                "mkdir: cannot create directory '{raw}': File exists"
            )));
        }
        children.insert(
            name.to_string(),
            FsNode::directory(next_monotonic_timestamp_ms()),
        );
        self.bump();
        debug!(path = %path, "created directory");
        Ok(path)
    }

    fn create_file(&mut self, raw: &str, file: Option<NewFile>) -> FsResult<String> {
        let path = self
            .resolve(raw)
            .filter(|path| path != ROOT_PATH)
            .ok_or_else(|| FsError::invalid_path(format!("touch: invalid path: {raw}")))?;
        let Some((parent, name)) = split_parent(&path) else {
            return Err(FsError::invalid_path(format!("touch: invalid path: {raw}")));
        };
        let kind = self.parent_error_kind(&parent);
        let Some(children) = get_dir_mut(&mut self.root, &parent) else {
            return Err(FsError::new(
                kind,
                format!("touch: cannot touch '{raw}': Parent directory does not exist"),
            ));
        };
        let now = next_monotonic_timestamp_ms();
        match children.get_mut(name) {
            Some(existing) if existing.is_file() => {
                warn!(path = %path, "touch on existing file only refreshes its timestamp");
                existing.touch(now);
            }
            Some(_) => {
                return Err(FsError::new(
                    FsErrorKind::NotAFile,
                    format!("touch: cannot touch '{raw}': Is a directory"),
                ));
            }
            None => {
                let NewFile { content, size } = file.unwrap_or_default();
                let size = size.unwrap_or(content.len() as u64);
                children.insert(name.to_string(), FsNode::file(content, size, now));
                debug!(path = %path, size, "created file");
            }
        }
        self.bump();
        Ok(path)
    }

    fn delete_item(&mut self, raw: &str) -> FsResult<()> {
        let path = self
            .resolve(raw)
            .filter(|path| path != ROOT_PATH)
            .ok_or_else(|| FsError::invalid_path(format!("delete: invalid path: {raw}")))?;
        let Some((parent, name)) = split_parent(&path) else {
            return Err(FsError::invalid_path(format!("delete: invalid path: {raw}")));
        };
        let kind = self.parent_error_kind(&parent);
        let Some(children) = get_dir_mut(&mut self.root, &parent) else {
            return Err(FsError::new(
                kind,
                format!("delete: cannot delete '{raw}': Parent directory does not exist"),
            ));
        };
        match children.get(name) {
            None => {
                return Err(FsError::not_found(format!(
                    "delete: cannot delete '{raw}': Item does not exist"
                )));
            }
            Some(node) if node.children().is_some_and(|c| !c.is_empty()) => {
                return Err(FsError::new(
                    FsErrorKind::NotEmpty,
                    format!("delete: cannot delete '{raw}': Directory not empty"),
                ));
            }
            Some(_) => {}
        }
        children.remove(name);
        if self.cwd == path {
            self.cwd = parent;
        }
        self.bump();
        debug!(path = %path, "deleted item");
        Ok(())
    }

    fn rename_item(&mut self, raw: &str, new_name: &str) -> FsResult<String> {
        if new_name.is_empty() || new_name.contains('/') || matches!(new_name, "." | "..") {
            return Err(FsError::invalid_path(format!(
                "rename: invalid new name: {new_name}"
            )));
        }
        let path = self
            .resolve(raw)
            .filter(|path| path != ROOT_PATH)
            .ok_or_else(|| FsError::invalid_path(format!("rename: invalid path: {raw}")))?;
        let Some((parent, old_name)) = split_parent(&path) else {
            return Err(FsError::invalid_path(format!("rename: invalid path: {raw}")));
        };
        let kind = self.parent_error_kind(&parent);
        let Some(children) = get_dir_mut(&mut self.root, &parent) else {
            return Err(FsError::new(
                kind,
                format!("rename: cannot rename '{raw}': Parent directory does not exist"),
            ));
        };
        if !children.contains_key(old_name) {
            return Err(FsError::not_found(format!(
                "rename: cannot rename '{raw}': Item does not exist"
            )));
        }
        if children.contains_key(new_name) {
            return Err(FsError::already_exists(format!(
                "rename: cannot rename to '{new_name}': Name already exists"
            )));
        }
        if let Some(mut node) = children.remove(old_name) {
            node.touch(next_monotonic_timestamp_ms());
            children.insert(new_name.to_string(), node);
        }
        let renamed = join_path(&parent, new_name);
        self.rebase_cwd(&path, &renamed);
        self.bump();
        debug!(from = %path, to = %renamed, "renamed item");
        Ok(renamed)
    }

    fn move_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        let (Some(src), Some(dst)) = (self.resolve(source), self.resolve(destination)) else {
            return Err(FsError::invalid_path("mv: invalid path specified"));
        };
        let Some((src_parent, src_name)) = split_parent(&src) else {
            return Err(FsError::invalid_path("mv: cannot move root directory"));
        };
        let src_is_dir = match get_node(&self.root, Some(&src)) {
            Some(node) => node.is_directory(),
            None => {
                return Err(FsError::not_found(format!(
                    "mv: cannot stat '{source}': No such file or directory"
                )));
            }
        };

        let (dst_parent, dst_name) = match self.classify_destination(&dst) {
            Ok(Destination::IntoDirectory(dir)) => {
                let taken = get_dir(&self.root, &dir).is_some_and(|c| c.contains_key(src_name));
                if taken {
                    return Err(FsError::already_exists(format!(
                        "mv: cannot move '{source}' to '{destination}/{src_name}': Destination exists"
                    )));
                }
                (dir, src_name.to_string())
            }
            Ok(Destination::Renamed { parent, name }) => (parent, name),
            Err(DestinationError::ExistingFile) => {
                return Err(FsError::already_exists(format!(
                    "mv: cannot overwrite non-directory '{destination}' with directory or file"
                )));
            }
            Err(DestinationError::MissingParent(kind)) => {
                return Err(FsError::new(
                    kind,
                    format!(
                        "mv: cannot move '{source}' to '{destination}': Parent directory does not exist"
                    ),
                ));
            }
        };

        let final_path = join_path(&dst_parent, &dst_name);
        if src_is_dir && is_within(&final_path, &src) {
            return Err(FsError::new(
                FsErrorKind::SelfContainment,
                format!("mv: cannot move directory into itself, '{source}' to '{destination}'"),
            ));
        }

        let Some(mut node) = get_dir_mut(&mut self.root, &src_parent)
            .and_then(|children| children.remove(src_name))
        else {
            return Err(FsError::not_found(format!(
                "mv: cannot stat '{source}': No such file or directory"
            )));
        };
        node.touch(next_monotonic_timestamp_ms());
        match get_dir_mut(&mut self.root, &dst_parent) {
            Some(children) => {
                children.insert(dst_name, node);
            }
            None => {
                if let Some(children) = get_dir_mut(&mut self.root, &src_parent) {
                    children.insert(src_name.to_string(), node);
                }
                return Err(FsError::not_found(format!(
                    "mv: failed to determine destination parent node for '{destination}'"
                )));
            }
        }
        self.rebase_cwd(&src, &final_path);
        self.bump();
        debug!(from = %src, to = %final_path, "moved item");
        Ok(final_path)
    }

    fn copy_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        let (Some(src), Some(dst)) = (self.resolve(source), self.resolve(destination)) else {
            return Err(FsError::invalid_path("cp: invalid path specified"));
        };
        if src == ROOT_PATH {
            return Err(FsError::invalid_path("cp: cannot copy root directory"));
        }
        let Some(source_node) = get_node(&self.root, Some(&src)) else {
            return Err(FsError::not_found(format!(
                "cp: cannot stat '{source}': No such file or directory"
            )));
        };
        let src_is_dir = source_node.is_directory();
        let src_name = file_name(&src).unwrap_or_default().to_string();

        let (dst_parent, wanted_name) = match self.classify_destination(&dst) {
            Ok(Destination::IntoDirectory(dir)) => (dir, src_name),
            Ok(Destination::Renamed { parent, name }) => (parent, name),
            Err(DestinationError::ExistingFile) => {
                return Err(FsError::already_exists(format!(
                    "cp: cannot overwrite non-directory '{destination}'"
                )));
            }
            Err(DestinationError::MissingParent(kind)) => {
                return Err(FsError::new(
                    kind,
                    format!("cp: cannot copy to '{destination}': Parent directory does not exist"),
                ));
            }
        };

        let siblings = get_dir(&self.root, &dst_parent);
        let Some(dst_name) = unique_copy_name(&wanted_name, |candidate| {
            siblings.is_some_and(|children| children.contains_key(candidate))
        }) else {
            return Err(FsError::already_exists(format!(
                "cp: Could not find a unique name for copy of '{wanted_name}'"
            )));
        };

        let final_path = join_path(&dst_parent, &dst_name);
        if src_is_dir && is_within(&final_path, &src) {
            return Err(FsError::new(
                FsErrorKind::SelfContainment,
                format!("cp: cannot copy directory into itself, '{source}' to '{destination}'"),
            ));
        }

        let mut copy = source_node.clone();
        copy.touch(next_monotonic_timestamp_ms());
        let Some(children) = get_dir_mut(&mut self.root, &dst_parent) else {
            return Err(FsError::not_found(format!(
                "cp: failed to determine destination parent node for '{destination}'"
            )));
        };
        children.insert(dst_name, copy);
        self.bump();
        debug!(from = %src, to = %final_path, "copied item");
        Ok(final_path)
    }

    fn write_file(&mut self, raw: &str, content: &str) -> FsResult<String> {
        let path = self
            .resolve(raw)
            .filter(|path| path != ROOT_PATH)
            .ok_or_else(|| FsError::invalid_path(format!("write: invalid path: {raw}")))?;
        let Some((parent, name)) = split_parent(&path) else {
            return Err(FsError::invalid_path(format!("write: invalid path: {raw}")));
        };
        let kind = self.parent_error_kind(&parent);
        let Some(children) = get_dir_mut(&mut self.root, &parent) else {
            return Err(FsError::new(
                kind,
                format!("write: cannot write to '{raw}': Parent directory does not exist"),
            ));
        };
        if children.get(name).is_some_and(FsNode::is_directory) {
            return Err(FsError::new(
                FsErrorKind::NotAFile,
                format!("write: cannot write to '{raw}': Destination exists and is not a file"),
            ));
        }
        children.insert(
            name.to_string(),
            FsNode::text_file(content, next_monotonic_timestamp_ms()),
        );
        self.bump();
        debug!(path = %path, bytes = content.len(), "wrote file");
        Ok(path)
    }

    fn read_file(&self, raw: &str) -> FsResult<String> {
        let path = self
            .resolve(raw)
            .ok_or_else(|| FsError::invalid_path(format!("cat: invalid path: {raw}")))?;
        match get_node(&self.root, Some(&path)) {
            None => Err(FsError::not_found(format!(
                "cat: {raw}: No such file or directory"
            ))),
            Some(FsNode::File { content, .. }) => Ok(content.clone()),
            Some(FsNode::Directory { .. }) => Err(FsError::new(
                FsErrorKind::NotAFile,
                format!("cat: {raw}: Is a directory"),
            )),
        }
    }
}
