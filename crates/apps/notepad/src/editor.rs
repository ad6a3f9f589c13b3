//! Text editor document bound to one window.

use desktop_app_contract::{AppHost, AppLaunchContext, WindowRuntimeId};
use platform_host::{file_name, parent_dir, FsError};
use thiserror::Error;
use tracing::{debug, warn};

/// Name shown for a document that was never saved.
pub const UNTITLED_FILE_NAME: &str = "Untitled";

const APP_LABEL: &str = "Text Editor";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Reasons a save did not happen.
pub enum EditorError {
    /// The document has no path yet; the caller should ask for one and use save-as.
    #[error("Choose a file name to save this document.")]
    NeedsPath,
    /// The file failed to load, so saving could clobber it.
    #[error("Cannot save due to loading error.")]
    LoadFailed,
    /// Save-as after a failed load with nothing typed.
    #[error("Cannot save due to loading error and no changes.")]
    LoadFailedUnchanged,
    /// The filesystem rejected the write.
    #[error(transparent)]
    Fs(#[from] FsError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Content and save state of the document in one text editor window.
pub struct TextDocument {
    window_id: WindowRuntimeId,
    path: Option<String>,
    content: String,
    dirty: bool,
    load_error: Option<String>,
}

impl TextDocument {
    /// Loads the file named by the launch context, or starts an untitled document.
    ///
    /// A failed read leaves the document empty and clean with [`Self::load_error`] set.
    pub fn open<H>(host: &mut H, context: &AppLaunchContext) -> Self
    where
        H: AppHost + ?Sized,
    {
        let path = context.file_path().map(str::to_string);
        let (content, load_error) = match path.as_deref().map(|p| host.read_file(p)) {
            None => (String::new(), None),
            Some(Ok(content)) => (content, None),
            Some(Err(err)) => {
                warn!(window_id = context.window_id, error = %err, "text editor load failed");
                (String::new(), Some(err.message))
            }
        };
        let document = Self {
            window_id: context.window_id,
            path,
            content,
            dirty: false,
            load_error,
        };
        host.mark_window_clean(document.window_id);
        document.sync_title(host);
        document
    }

    /// Absolute path, `None` until first saved.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Current buffer.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the buffer differs from what was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read error from [`Self::open`], if any.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Number of lines shown in the gutter.
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// File name, or [`UNTITLED_FILE_NAME`].
    pub fn display_name(&self) -> &str {
        self.path
            .as_deref()
            .and_then(file_name)
            .unwrap_or(UNTITLED_FILE_NAME)
    }

    /// Window title: `name - Text Editor`, with `*` after the name while dirty.
    pub fn title(&self) -> String {
        let mark = if self.dirty { "*" } else { "" };
        format!("{}{mark} - {APP_LABEL}", self.display_name())
    }

    /// File name prefilled in the save-as dialog.
    pub fn suggested_file_name(&self) -> String {
        match self.path.as_deref().and_then(file_name) {
            Some(name) => name.to_string(),
            None => format!("{UNTITLED_FILE_NAME}.txt"),
        }
    }

    /// Folder the save-as dialog starts in.
    pub fn suggested_directory(&self, cwd: &str) -> String {
        match self.path.as_deref() {
            Some(path) => parent_dir(path),
            None => cwd.to_string(),
        }
    }

    fn sync_title<H>(&self, host: &mut H)
    where
        H: AppHost + ?Sized,
    {
        host.update_window_title(self.window_id, &self.title());
    }

    /// Replaces the buffer. The first change after a load or save marks the window dirty.
    pub fn edit<H>(&mut self, host: &mut H, content: impl Into<String>)
    where
        H: AppHost + ?Sized,
    {
        self.content = content.into();
        if !self.dirty {
            self.dirty = true;
            host.mark_window_dirty(self.window_id);
            self.sync_title(host);
        }
    }

    /// Writes the buffer to its current path.
    pub fn save<H>(&mut self, host: &mut H) -> Result<String, EditorError>
    where
        H: AppHost + ?Sized,
    {
        let Some(path) = self.path.clone() else {
            return Err(EditorError::NeedsPath);
        };
        if self.load_error.is_some() {
            return Err(EditorError::LoadFailed);
        }
        host.write_file(&path, &self.content)?;
        self.mark_saved(host);
        Ok("File saved!".to_string())
    }

    /// Writes the buffer to `path` and adopts it as the document path.
    pub fn save_as<H>(&mut self, host: &mut H, path: &str) -> Result<String, EditorError>
    where
        H: AppHost + ?Sized,
    {
        if self.load_error.is_some() && !self.dirty {
            return Err(EditorError::LoadFailedUnchanged);
        }
        let saved = host.write_file(path, &self.content)?;
        self.path = Some(saved);
        self.load_error = None;
        self.mark_saved(host);
        Ok(format!("File saved: {}", self.display_name()))
    }

    fn mark_saved<H>(&mut self, host: &mut H)
    where
        H: AppHost + ?Sized,
    {
        debug!(window_id = self.window_id, path = ?self.path, "text document saved");
        self.dirty = false;
        host.mark_window_clean(self.window_id);
        self.sync_title(host);
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{file_launch_params, AppCommand, AppId, MemoryAppHost};
    use pretty_assertions::assert_eq;

    use super::*;

    fn launch(id: WindowRuntimeId, path: Option<&str>) -> AppLaunchContext {
        AppLaunchContext::new(AppId::TextEditor, id, path.map(file_launch_params))
    }

    #[test]
    fn untitled_document_starts_clean() {
        let mut host = MemoryAppHost::default();
        let doc = TextDocument::open(&mut host, &launch(1, None));
        assert_eq!(doc.title(), "Untitled - Text Editor");
        assert_eq!(doc.suggested_file_name(), "Untitled.txt");
        assert_eq!(doc.suggested_directory("/home"), "/home");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(
            host.commands,
            [
                (1, AppCommand::MarkClean),
                (
                    1,
                    AppCommand::SetWindowTitle {
                        title: "Untitled - Text Editor".to_string()
                    }
                ),
            ]
        );
    }

    #[test]
    fn only_first_edit_marks_dirty() {
        let mut host = MemoryAppHost::default();
        let mut doc = TextDocument::open(&mut host, &launch(2, None));
        host.commands.clear();

        doc.edit(&mut host, "a");
        doc.edit(&mut host, "ab\ncd");
        assert!(doc.is_dirty());
        assert_eq!(doc.line_count(), 2);
        let dirty_marks = host
            .commands
            .iter()
            .filter(|(_, command)| *command == AppCommand::MarkDirty)
            .count();
        assert_eq!(dirty_marks, 1);
        assert_eq!(host.last_title(2), Some("Untitled* - Text Editor"));
    }

    #[test]
    fn save_without_path_needs_save_as() {
        let mut host = MemoryAppHost::default();
        let mut doc = TextDocument::open(&mut host, &launch(3, None));
        doc.edit(&mut host, "draft");
        assert_eq!(doc.save(&mut host), Err(EditorError::NeedsPath));
        assert!(doc.is_dirty());
    }
}
