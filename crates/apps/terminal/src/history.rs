//! Bounded, de-duplicated command history with up/down navigation.

/// Default number of remembered commands.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Command history with a navigation cursor.
pub struct CommandHistory {
    entries: Vec<String>,
    limit: usize,
    cursor: Option<usize>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    /// Creates an empty history keeping at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
            cursor: None,
        }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Records `command` as the newest entry, dropping any older copy and the oldest overflow.
    pub fn push(&mut self, command: &str) {
        self.entries.retain(|entry| entry != command);
        self.entries.push(command.to_string());
        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(0..overflow);
        }
        self.cursor = None;
    }

    /// Steps to an older entry. `None` leaves the input unchanged.
    pub fn previous(&mut self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(index) => index.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.entries.get(index).cloned()
    }

    /// Steps to a newer entry; stepping past the newest clears the input.
    pub fn next(&mut self) -> Option<String> {
        let index = self.cursor?;
        if index + 1 >= self.entries.len() {
            self.cursor = None;
            return Some(String::new());
        }
        self.cursor = Some(index + 1);
        self.entries.get(index + 1).cloned()
    }

    /// Forgets the navigation position.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }
}
