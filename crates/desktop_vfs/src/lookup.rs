//! Path-to-node lookup over a directory tree.
//!
//! Lookups take already-resolved absolute paths. The root directory is the node reached with
//! zero segments, so `/` always resolves as long as the tree exists.

use platform_host::fs::path::path_segments;
use platform_host::fs::types::DirectoryContent;
use platform_host::FsNode;

/// Returns the node at `path`, or `None` when any segment is missing or crosses a file.
///
/// A `None` path yields `None`, so the result of a failed resolution can be passed through.
pub fn get_node<'a>(root: &'a FsNode, path: Option<&str>) -> Option<&'a FsNode> {
    let mut node = root;
    for segment in path_segments(path?) {
        node = node.children()?.get(segment)?;
    }
    Some(node)
}

/// Mutable counterpart of [`get_node`].
pub fn get_node_mut<'a>(root: &'a mut FsNode, path: &str) -> Option<&'a mut FsNode> {
    let mut node = root;
    for segment in path_segments(path) {
        node = node.children_mut()?.get_mut(segment)?;
    }
    Some(node)
}

/// Returns the child map of the directory at `path`.
pub fn get_dir<'a>(root: &'a FsNode, path: &str) -> Option<&'a DirectoryContent> {
    get_node(root, Some(path))?.children()
}

/// Returns the mutable child map of the directory at `path`.
pub fn get_dir_mut<'a>(root: &'a mut FsNode, path: &str) -> Option<&'a mut DirectoryContent> {
    get_node_mut(root, path)?.children_mut()
}
