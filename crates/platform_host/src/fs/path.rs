//! Virtual-path resolution helpers shared across the filesystem engine and its consumers.
//!
//! Paths are `/`-separated strings. A resolved path is always absolute, carries no empty,
//! `.` or `..` segments, and has no trailing slash except for the root itself.

/// The root of the virtual tree.
pub const ROOT_PATH: &str = "/";

/// Resolves `raw` against `cwd` into a normalized absolute path.
///
/// Absolute inputs ignore `cwd`. Empty segments and `.` are dropped, `..` pops the previous
/// segment. Returns `None` for an empty input or when `..` would ascend past the root; the
/// resolver never clamps at `/`.
pub fn resolve_path(raw: &str, cwd: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let mut segments: Vec<&str> = if raw.starts_with('/') {
        Vec::new()
    } else {
        path_segments(cwd).collect()
    };

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    Some(format!("/{}", segments.join("/")))
}

/// Iterates the non-empty segments of a path.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Splits a normalized path into its parent directory and leaf name.
///
/// Returns `None` for the root, which has no parent.
pub fn split_parent(path: &str) -> Option<(String, &str)> {
    let trimmed = path.trim_end_matches('/');
    let idx = trimmed.rfind('/')?;
    let leaf = &trimmed[idx + 1..];
    if leaf.is_empty() {
        return None;
    }
    let parent = if idx == 0 { ROOT_PATH } else { &trimmed[..idx] };
    Some((parent.to_string(), leaf))
}

/// Joins a directory path and a child name without doubling the root separator.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir == ROOT_PATH || dir.is_empty() {
        format!("/{name}")
    } else {
        format!("{}/{name}", dir.trim_end_matches('/'))
    }
}

/// Returns `true` when `path` lies strictly below `ancestor`.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT_PATH {
        return path.len() > 1 && path.starts_with('/');
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Returns the last segment of a path, or `None` for the root.
pub fn file_name(path: &str) -> Option<&str> {
    path_segments(path).last()
}

/// Returns the parent directory of a normalized path; the root is its own parent.
pub fn parent_dir(path: &str) -> String {
    split_parent(path)
        .map(|(parent, _)| parent)
        .unwrap_or_else(|| ROOT_PATH.to_string())
}
