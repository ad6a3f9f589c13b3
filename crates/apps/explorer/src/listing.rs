//! Filtering of a sorted directory listing and breadcrumb segments.

use platform_host::{path_segments, FsEntry, ROOT_PATH};

/// Entries to display: dot-files are hidden unless `show_hidden`, and a non-empty `search`
/// keeps names containing it case-insensitively. Input order is preserved.
pub fn visible_entries<'a>(
    entries: &'a [FsEntry],
    show_hidden: bool,
    search: &str,
) -> Vec<&'a FsEntry> {
    let needle = search.to_lowercase();
    entries
        .iter()
        .filter(|entry| show_hidden || !entry.name.starts_with('.'))
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One clickable segment of the path bar.
pub struct Breadcrumb {
    /// Segment text; the root is shown as `/`.
    pub label: String,
    /// Absolute path the segment navigates to.
    pub path: String,
}

/// Splits an absolute path into root-first breadcrumbs.
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: ROOT_PATH.to_string(),
        path: ROOT_PATH.to_string(),
    }];
    let mut current = String::new();
    for segment in path_segments(path) {
        current.push('/');
        current.push_str(segment);
        crumbs.push(Breadcrumb {
            label: segment.to_string(),
            path: current.clone(),
        });
    }
    crumbs
}
