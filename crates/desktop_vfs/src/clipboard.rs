//! Cut/copy/paste over any [`VirtualFsService`].

use platform_host::VirtualFsService;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::report::BatchReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Pending clipboard operation.
pub enum ClipboardOperation {
    /// Paste deep-copies the sources.
    Copy,
    /// Paste moves the sources.
    Cut,
}

impl ClipboardOperation {
    /// Past-tense verb used in user-facing summaries.
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Copy => "copied",
            Self::Cut => "moved",
        }
    }

    /// Imperative verb used in user-facing summaries.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Cut => "cut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Clipboard content: one operation over an ordered list of absolute paths.
pub struct Clipboard {
    /// Operation applied on paste.
    pub operation: ClipboardOperation,
    /// Absolute source paths, in selection order.
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected clipboard requests.
pub enum ClipboardError {
    /// `set` was called without any paths.
    #[error("{} requires at least one path", .0.verb())]
    EmptySelection(ClipboardOperation),
    /// A path was not absolute.
    #[error("clipboard paths must be absolute: {0}")]
    RelativePath(String),
    /// `paste` was called with nothing on the clipboard.
    #[error("Clipboard is empty.")]
    Empty,
    /// The paste destination is missing or is not a directory.
    #[error("Cannot paste into '{0}': Not a directory or not found")]
    DestinationNotADirectory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of a paste.
pub struct PasteReport {
    /// Operation that was applied.
    pub operation: ClipboardOperation,
    /// Per-item outcomes.
    pub items: BatchReport,
    /// Whether the clipboard was cleared afterwards.
    pub clipboard_cleared: bool,
}

impl PasteReport {
    /// Success headline, e.g. `Successfully moved 2 item(s).`
    pub fn success_message(&self) -> Option<String> {
        (self.items.success_count() > 0).then(|| {
            format!(
                "Successfully {} {} item(s).",
                self.operation.past_tense(),
                self.items.success_count()
            )
        })
    }

    /// Failure headline quoting the first error.
    pub fn failure_message(&self) -> Option<String> {
        let first = self.items.first_error()?;
        Some(format!(
            "Failed to {} {} item(s). ({first})",
            self.operation.verb(),
            self.items.failure_count()
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Holds at most one pending clipboard operation.
pub struct ClipboardController {
    content: Option<Clipboard>,
}

impl ClipboardController {
    /// Current clipboard content.
    pub fn content(&self) -> Option<&Clipboard> {
        self.content.as_ref()
    }

    /// Returns `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Returns `true` when `path` is pending a cut; explorers dim such entries.
    pub fn is_cut(&self, path: &str) -> bool {
        self.content.as_ref().is_some_and(|clipboard| {
            clipboard.operation == ClipboardOperation::Cut
                && clipboard.paths.iter().any(|p| p == path)
        })
    }

    /// Replaces the clipboard wholesale. Invalid requests leave the previous content intact.
    pub fn set(
        &mut self,
        operation: ClipboardOperation,
        paths: Vec<String>,
    ) -> Result<(), ClipboardError> {
        if paths.is_empty() {
            return Err(ClipboardError::EmptySelection(operation));
        }
        if let Some(relative) = paths.iter().find(|p| !p.starts_with('/')) {
            return Err(ClipboardError::RelativePath(relative.clone()));
        }
        debug!(?operation, count = paths.len(), "clipboard set");
        self.content = Some(Clipboard { operation, paths });
        Ok(())
    }

    /// Empties the clipboard.
    pub fn clear(&mut self) {
        self.content = None;
    }

    /// Applies the pending operation to each path, in order, into `destination`.
    ///
    /// `destination` must name an existing directory; otherwise nothing is touched and the
    /// clipboard is kept. Items are processed best-effort and successful ones are never rolled
    /// back. A cut is cleared only when every item moved, so a partial failure can be retried.
    pub fn paste(
        &mut self,
        fs: &mut dyn VirtualFsService,
        destination: &str,
    ) -> Result<PasteReport, ClipboardError> {
        let Some(clipboard) = self.content.as_ref() else {
            return Err(ClipboardError::Empty);
        };
        let target = match fs.stat(destination) {
            Ok(entry) if entry.is_directory() => entry.path,
            _ => {
                return Err(ClipboardError::DestinationNotADirectory(
                    destination.to_string(),
                ))
            }
        };
        let operation = clipboard.operation;
        let mut items = BatchReport::default();
        for source in &clipboard.paths {
            let result = match operation {
                ClipboardOperation::Copy => fs.copy_item(source, &target),
                ClipboardOperation::Cut => fs.move_item(source, &target),
            };
            items.record(source.clone(), result.map(Some));
        }

        let clipboard_cleared = operation == ClipboardOperation::Cut && items.is_complete();
        if clipboard_cleared {
            self.clear();
        }
        debug!(
            ?operation,
            destination,
            succeeded = items.success_count(),
            failed = items.failure_count(),
            "paste finished"
        );
        Ok(PasteReport {
            operation,
            items,
            clipboard_cleared,
        })
    }
}
