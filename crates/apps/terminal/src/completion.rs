//! Tab completion over command names and directory entries.

use platform_host::{join_path, VirtualFsService};

/// Commands understood by the terminal, in help order.
pub const KNOWN_COMMANDS: [&str; 12] = [
    "help", "clear", "pwd", "ls", "cd", "mkdir", "touch", "cat", "rm", "mv", "cp", "echo",
];

const LISTING_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a tab press did.
pub enum Completion {
    /// Nothing matched, or the word under the cursor is empty.
    NoMatch,
    /// The input was extended.
    Completed(String),
    /// Several candidates share no longer prefix; a second tab lists them.
    Ambiguous,
    /// Candidates to show the user, sorted.
    Listed(Vec<String>),
}

/// Candidate names for the last word of `input`, plus whether each one is a directory.
fn candidates(input: &str, fs: &dyn VirtualFsService) -> (String, Vec<(String, bool)>) {
    let trimmed = input.trim_start();
    let typing_command = !trimmed.contains(char::is_whitespace);
    let word = trimmed
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_string();

    if typing_command {
        let names = KNOWN_COMMANDS
            .iter()
            .map(|cmd| (cmd.to_string(), false))
            .collect();
        return (word, names);
    }

    // `dir/partial` completes inside `dir`; the directory part is kept verbatim.
    let (dir, _) = word.rsplit_once('/').unwrap_or(("", &word));
    let listing = match dir {
        "" if word.starts_with('/') => fs.list_directory(Some("/")),
        "" => fs.list_directory(None),
        dir => fs.list_directory(Some(dir)),
    };
    let names = listing
        .map(|entries| {
            entries
                .into_values()
                .map(|entry| {
                    let shown = if word.contains('/') {
                        join_path(if dir.is_empty() { "/" } else { dir }, &entry.name)
                    } else {
                        entry.name.clone()
                    };
                    (shown, entry.is_directory())
                })
                .collect()
        })
        .unwrap_or_default();
    (word, names)
}

fn longest_common_prefix<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words = words.into_iter();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut prefix = first.to_string();
    for word in words {
        let common = prefix
            .char_indices()
            .zip(word.chars())
            .find(|((_, a), b)| a != b)
            .map(|((idx, _), _)| idx)
            .unwrap_or_else(|| prefix.len().min(word.len()));
        prefix.truncate(common);
    }
    prefix
}

/// Wraps sorted matches into lines of at most 80 columns separated by two spaces.
pub fn layout_matches(matches: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for (index, name) in matches.iter().enumerate() {
        let segment = if index + 1 == matches.len() {
            name.clone()
        } else {
            format!("{name}  ")
        };
        if !current.is_empty() && current.len() + segment.len() > LISTING_WIDTH {
            lines.push(current.trim_end().to_string());
            current.clear();
        }
        current.push_str(&segment);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Tracks the previous ambiguous tab so a second press lists candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completer {
    last_ambiguous: Option<String>,
}

impl Completer {
    /// Forgets the previous ambiguous tab.
    pub fn reset(&mut self) {
        self.last_ambiguous = None;
    }

    /// Completes the last word of `input`.
    pub fn complete(&mut self, input: &str, fs: &dyn VirtualFsService) -> Completion {
        let (word, names) = candidates(input, fs);
        if word.is_empty() {
            self.reset();
            return Completion::NoMatch;
        }
        let mut matches: Vec<_> = names
            .into_iter()
            .filter(|(name, _)| name.starts_with(&word))
            .collect();
        matches.sort();
        let base = &input[..input.len() - word.len()];

        match matches.as_slice() {
            [] => {
                self.reset();
                Completion::NoMatch
            }
            [(name, is_dir)] => {
                self.reset();
                let suffix = if *is_dir { "/" } else { " " };
                Completion::Completed(format!("{base}{name}{suffix}"))
            }
            _ => {
                let prefix = longest_common_prefix(matches.iter().map(|(name, _)| name.as_str()));
                if prefix.len() > word.len() {
                    self.last_ambiguous = Some(prefix.clone());
                    return Completion::Completed(format!("{base}{prefix}"));
                }
                if self.last_ambiguous.as_deref() == Some(word.as_str()) {
                    self.reset();
                    return Completion::Listed(matches.into_iter().map(|(name, _)| name).collect());
                }
                self.last_ambiguous = Some(word);
                Completion::Ambiguous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use platform_host::NoopVirtualFsService;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn longest_common_prefix_handles_divergence() {
        assert_eq!(longest_common_prefix(["mkdir", "mv"]), "m");
        assert_eq!(longest_common_prefix(["cat", "cat"]), "cat");
        assert_eq!(longest_common_prefix(["abc", "ab"]), "ab");
        assert_eq!(longest_common_prefix(std::iter::empty()), "");
    }

    #[test]
    fn unique_command_completes_with_space() {
        let mut completer = Completer::default();
        assert_eq!(
            completer.complete("pw", &NoopVirtualFsService),
            Completion::Completed("pwd ".to_string())
        );
    }

    #[test]
    fn second_tab_lists_ambiguous_commands() {
        let mut completer = Completer::default();
        let fs = NoopVirtualFsService;
        assert_eq!(completer.complete("c", &fs), Completion::Ambiguous);
        assert_eq!(
            completer.complete("c", &fs),
            Completion::Listed(vec![
                "cat".to_string(),
                "cd".to_string(),
                "clear".to_string(),
                "cp".to_string()
            ])
        );
    }

    #[test]
    fn trailing_space_or_unknown_prefix_is_no_match() {
        let mut completer = Completer::default();
        let fs = NoopVirtualFsService;
        assert_eq!(completer.complete("ls ", &fs), Completion::NoMatch);
        assert_eq!(completer.complete("zz", &fs), Completion::NoMatch);
        assert_eq!(completer.complete("ls x", &fs), Completion::NoMatch);
    }

    #[test]
    fn layout_wraps_at_eighty_columns() {
        let names: Vec<String> = (0..10).map(|i| format!("entry-{i:03}-name")).collect();
        let lines = layout_matches(&names);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.len() <= LISTING_WIDTH));
        let listed: Vec<&str> = lines.iter().flat_map(|line| line.split_whitespace()).collect();
        assert_eq!(listed.len(), names.len());
    }
}
