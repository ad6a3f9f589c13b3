//! Collision-free name allocation for copies.

/// Highest counter tried when allocating a `name (n).ext` copy name.
pub const MAX_COPY_NAME_ATTEMPTS: u32 = 100;

/// Splits `name` at its last `.`, keeping dot-files whole.
///
/// `"notes.tar.gz"` splits into `("notes.tar", ".gz")`; `".profile"` and `"README"` have no
/// extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Returns `name` when it is free, otherwise the first free `base (n)ext` for `n` in
/// `2..=MAX_COPY_NAME_ATTEMPTS`, or `None` when every candidate is taken.
pub fn unique_copy_name(name: &str, is_taken: impl Fn(&str) -> bool) -> Option<String> {
    if !is_taken(name) {
        return Some(name.to_string());
    }
    let (base, extension) = split_extension(name);
    (2..=MAX_COPY_NAME_ATTEMPTS)
        .map(|counter| format!("{base} ({counter}){extension}"))
        .find(|candidate| !is_taken(candidate))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn split_extension_keeps_dot_files_whole() {
        assert_eq!(split_extension("readme.txt"), ("readme", ".txt"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension(".profile"), (".profile", ""));
        assert_eq!(split_extension("Makefile"), ("Makefile", ""));
    }

    #[test]
    fn unique_copy_name_counts_from_two() {
        let taken: BTreeSet<String> = ["a.txt", "a (2).txt"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            unique_copy_name("b.txt", |n| taken.contains(n)).as_deref(),
            Some("b.txt")
        );
        assert_eq!(
            unique_copy_name("a.txt", |n| taken.contains(n)).as_deref(),
            Some("a (3).txt")
        );
    }

    #[test]
    fn unique_copy_name_gives_up_after_limit() {
        assert_eq!(unique_copy_name("dir", |_| true), None);
        let last = unique_copy_name("dir", |n| n != "dir (100)");
        assert_eq!(last.as_deref(), Some("dir (100)"));
    }
}
