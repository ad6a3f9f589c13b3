//! Shared contract types between the desktop window manager runtime and managed apps.
//!
//! Apps receive an [`AppLaunchContext`] when their window opens and talk back to the runtime
//! through an [`AppHost`]: filesystem calls go straight to the shared [`VirtualFsService`],
//! clipboard calls to the shared clipboard, and window-level requests travel as
//! [`AppCommand`] values tagged with the sender's window id.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use desktop_vfs::{
    Clipboard, ClipboardController, ClipboardError, ClipboardOperation, PasteReport, VirtualFs,
};
use platform_host::{file_name, FsEntry, FsResult, NewFile, VirtualFsService};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Identifier of an installed desktop app.
pub enum AppId {
    /// File browser.
    FileExplorer,
    /// Command-line terminal.
    Terminal,
    /// Desktop settings.
    Settings,
    /// Plain-text editor.
    TextEditor,
    /// Image viewer.
    ImageViewer,
}

impl AppId {
    /// All apps, in registry order.
    pub const ALL: [AppId; 5] = [
        Self::FileExplorer,
        Self::Terminal,
        Self::Settings,
        Self::TextEditor,
        Self::ImageViewer,
    ];

    /// Returns the stable string id (`file-explorer`, `terminal`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileExplorer => "file-explorer",
            Self::Terminal => "terminal",
            Self::Settings => "settings",
            Self::TextEditor => "text-editor",
            Self::ImageViewer => "image-viewer",
        }
    }

    /// Parses a stable string id.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.as_str() == raw)
    }
}

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Window-level requests emitted by apps to the desktop runtime.
pub enum AppCommand {
    /// Replace the sender window's title.
    SetWindowTitle {
        /// New title text.
        title: String,
    },
    /// Flag the sender window as holding unsaved changes.
    MarkDirty,
    /// Clear the sender window's unsaved-changes flag.
    MarkClean,
    /// Open another app window.
    OpenWindow {
        /// App to open.
        app_id: AppId,
        /// Opaque launch payload handed to the new window.
        context: Option<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-window launch data handed to an app when its window opens.
pub struct AppLaunchContext {
    /// App that owns the window.
    pub app_id: AppId,
    /// Runtime window id.
    pub window_id: WindowRuntimeId,
    /// Launch payload supplied at window-open time (`Value::Null` when absent).
    pub launch_params: Value,
}

impl AppLaunchContext {
    /// Creates a context with an optional launch payload.
    pub fn new(app_id: AppId, window_id: WindowRuntimeId, launch_params: Option<Value>) -> Self {
        Self {
            app_id,
            window_id,
            launch_params: launch_params.unwrap_or(Value::Null),
        }
    }

    /// Returns the `file_path` launch parameter, if any.
    pub fn file_path(&self) -> Option<&str> {
        self.launch_params.get("file_path")?.as_str()
    }

    /// Returns the base name of [`Self::file_path`].
    pub fn file_name(&self) -> Option<&str> {
        file_name(self.file_path()?)
    }
}

/// Builds the launch payload used when opening a file in an app.
pub fn file_launch_params(path: &str) -> Value {
    json!({ "file_path": path })
}

/// Runtime services available to a mounted app.
pub trait AppHost: VirtualFsService {
    /// Delivers a window-level request on behalf of `window_id`.
    fn dispatch(&mut self, window_id: WindowRuntimeId, command: AppCommand);

    /// Returns the shared clipboard content.
    fn clipboard(&self) -> Option<Clipboard>;

    /// Replaces the shared clipboard content.
    fn set_clipboard(
        &mut self,
        operation: ClipboardOperation,
        paths: Vec<String>,
    ) -> Result<(), ClipboardError>;

    /// Pastes the shared clipboard into `destination`.
    fn paste(&mut self, destination: &str) -> Result<PasteReport, ClipboardError>;

    /// Replaces the title of `window_id`.
    fn update_window_title(&mut self, window_id: WindowRuntimeId, title: &str) {
        self.dispatch(
            window_id,
            AppCommand::SetWindowTitle {
                title: title.to_string(),
            },
        );
    }

    /// Flags `window_id` as holding unsaved changes.
    fn mark_window_dirty(&mut self, window_id: WindowRuntimeId) {
        self.dispatch(window_id, AppCommand::MarkDirty);
    }

    /// Clears the unsaved-changes flag of `window_id`.
    fn mark_window_clean(&mut self, window_id: WindowRuntimeId) {
        self.dispatch(window_id, AppCommand::MarkClean);
    }

    /// Asks the runtime to open `app_id` on behalf of `window_id`.
    fn open_window(&mut self, window_id: WindowRuntimeId, app_id: AppId, context: Option<Value>) {
        self.dispatch(window_id, AppCommand::OpenWindow { app_id, context });
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory [`AppHost`] for headless hosts and app tests.
///
/// Owns its own filesystem and clipboard and records every dispatched command.
pub struct MemoryAppHost {
    /// Backing filesystem.
    pub fs: VirtualFs,
    /// Backing clipboard.
    pub clipboard: ClipboardController,
    /// Commands received, in dispatch order.
    pub commands: Vec<(WindowRuntimeId, AppCommand)>,
}

impl MemoryAppHost {
    /// Creates a host over an existing filesystem.
    pub fn with_fs(fs: VirtualFs) -> Self {
        Self {
            fs,
            ..Self::default()
        }
    }

    /// Returns the most recent title requested by `window_id`.
    pub fn last_title(&self, window_id: WindowRuntimeId) -> Option<&str> {
        self.commands.iter().rev().find_map(|(id, command)| match command {
            AppCommand::SetWindowTitle { title } if *id == window_id => Some(title.as_str()),
            _ => None,
        })
    }
}

impl VirtualFsService for MemoryAppHost {
    fn cwd(&self) -> String {
        self.fs.cwd()
    }

    fn set_cwd(&mut self, path: &str) -> FsResult<String> {
        self.fs.set_cwd(path)
    }

    fn list_directory(
        &self,
        path: Option<&str>,
    ) -> FsResult<std::collections::BTreeMap<String, FsEntry>> {
        self.fs.list_directory(path)
    }

    fn stat(&self, path: &str) -> FsResult<FsEntry> {
        self.fs.stat(path)
    }

    fn create_directory(&mut self, path: &str) -> FsResult<String> {
        self.fs.create_directory(path)
    }

    fn create_file(&mut self, path: &str, file: Option<NewFile>) -> FsResult<String> {
        self.fs.create_file(path, file)
    }

    fn delete_item(&mut self, path: &str) -> FsResult<()> {
        self.fs.delete_item(path)
    }

    fn rename_item(&mut self, path: &str, new_name: &str) -> FsResult<String> {
        self.fs.rename_item(path, new_name)
    }

    fn move_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        self.fs.move_item(source, destination)
    }

    fn copy_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        self.fs.copy_item(source, destination)
    }

    fn write_file(&mut self, path: &str, content: &str) -> FsResult<String> {
        self.fs.write_file(path, content)
    }

    fn read_file(&self, path: &str) -> FsResult<String> {
        self.fs.read_file(path)
    }
}

impl AppHost for MemoryAppHost {
    fn dispatch(&mut self, window_id: WindowRuntimeId, command: AppCommand) {
        self.commands.push((window_id, command));
    }

    fn clipboard(&self) -> Option<Clipboard> {
        self.clipboard.content().cloned()
    }

    fn set_clipboard(
        &mut self,
        operation: ClipboardOperation,
        paths: Vec<String>,
    ) -> Result<(), ClipboardError> {
        self.clipboard.set(operation, paths)
    }

    fn paste(&mut self, destination: &str) -> Result<PasteReport, ClipboardError> {
        self.clipboard.paste(&mut self.fs, destination)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn app_id_serde_uses_stable_kebab_ids() {
        for app in AppId::ALL {
            let json = serde_json::to_string(&app).expect("serialize");
            assert_eq!(json, format!("\"{}\"", app.as_str()));
            assert_eq!(AppId::parse(app.as_str()), Some(app));
        }
        assert_eq!(AppId::parse("calculator"), None);
    }

    #[test]
    fn launch_context_exposes_file_path() {
        let ctx = AppLaunchContext::new(
            AppId::TextEditor,
            4,
            Some(file_launch_params("/home/readme.txt")),
        );
        assert_eq!(ctx.file_path(), Some("/home/readme.txt"));
        assert_eq!(ctx.file_name(), Some("readme.txt"));

        let bare = AppLaunchContext::new(AppId::Terminal, 5, None);
        assert_eq!(bare.launch_params, Value::Null);
        assert_eq!(bare.file_path(), None);
    }

    #[test]
    fn memory_host_records_commands_and_shares_clipboard_with_fs() {
        let mut host = MemoryAppHost::default();
        host.mark_window_dirty(1);
        host.update_window_title(1, "a");
        host.update_window_title(2, "b");
        assert_eq!(host.last_title(1), Some("a"));
        assert_eq!(host.commands.len(), 3);

        host.set_clipboard(
            ClipboardOperation::Copy,
            vec!["/home/readme.txt".to_string()],
        )
        .expect("set");
        let report = host.paste("/system").expect("paste");
        assert_eq!(report.items.success_count(), 1);
        assert!(host.exists("/system/readme.txt"));
        assert!(host.clipboard().is_some());
    }
}
