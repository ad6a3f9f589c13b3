//! Per-window explorer state and the actions a user can take on it.

use desktop_app_contract::{file_launch_params, AppHost, WindowRuntimeId};
use desktop_vfs::ClipboardOperation;
use platform_host::{file_name, join_path, parent_dir, FsEntry, VirtualFsService, ROOT_PATH};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::import::DroppedFile;
use crate::listing::{breadcrumbs, visible_entries, Breadcrumb};
use crate::routing::app_for_file;
use crate::selection::{ClickModifier, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a [`Notice`].
pub enum NoticeLevel {
    /// The action succeeded.
    Success,
    /// The action, or part of it, failed.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// User-facing outcome of an action, shown as a toast.
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Returns `true` for [`NoticeLevel::Error`].
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Clone, PartialEq)]
/// View model of one explorer window.
pub struct ExplorerModel {
    window_id: WindowRuntimeId,
    current_path: String,
    entries: Vec<FsEntry>,
    selection: Selection,
    search: String,
    show_hidden_files: bool,
}

impl ExplorerModel {
    /// Opens an explorer window at the filesystem's working directory.
    pub fn open<F>(window_id: WindowRuntimeId, fs: &F, show_hidden_files: bool) -> Self
    where
        F: VirtualFsService + ?Sized,
    {
        let mut model = Self {
            window_id,
            current_path: fs.cwd(),
            entries: Vec::new(),
            selection: Selection::default(),
            search: String::new(),
            show_hidden_files,
        };
        model.refresh(fs);
        model
    }

    /// Window this model belongs to.
    pub fn window_id(&self) -> WindowRuntimeId {
        self.window_id
    }

    /// Absolute path of the folder being shown.
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Every entry of the current folder, directories first.
    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    /// Entries after the hidden-file and search filters.
    pub fn visible(&self) -> Vec<&FsEntry> {
        visible_entries(&self.entries, self.show_hidden_files, &self.search)
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected names in listing order.
    pub fn selected_names(&self) -> Vec<String> {
        self.selection.ordered_names(&self.entries)
    }

    /// Search filter text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search filter.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Toggles dot-file visibility.
    pub fn set_show_hidden_files(&mut self, show: bool) {
        self.show_hidden_files = show;
    }

    /// Path bar segments for the current folder.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.current_path)
    }

    fn path_of(&self, name: &str) -> String {
        join_path(&self.current_path, name)
    }

    fn entry(&self, name: &str) -> Option<&FsEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Re-reads the current folder. A folder that disappeared lists as empty.
    pub fn refresh<F>(&mut self, fs: &F)
    where
        F: VirtualFsService + ?Sized,
    {
        self.entries = match fs.list_entries(Some(self.current_path.as_str())) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.current_path, error = %err, "explorer listing failed");
                Vec::new()
            }
        };
        self.selection.retain_present(&self.entries);
    }

    /// Shows the folder at `path`, clearing selection and search.
    pub fn navigate_to<F>(&mut self, fs: &F, path: &str) -> Result<(), Notice>
    where
        F: VirtualFsService + ?Sized,
    {
        let target = fs.stat(path).map_err(|err| Notice::error(err.message))?;
        if !target.is_directory() {
            return Err(Notice::error(format!("Not a directory: {path}")));
        }
        debug!(window_id = self.window_id, path = %target.path, "explorer navigate");
        self.current_path = target.path;
        self.selection.clear();
        self.search.clear();
        self.refresh(fs);
        Ok(())
    }

    /// Goes to the parent folder; a no-op at the root.
    pub fn navigate_up<F>(&mut self, fs: &F) -> Result<(), Notice>
    where
        F: VirtualFsService + ?Sized,
    {
        self.selection.clear();
        if self.current_path == ROOT_PATH {
            return Ok(());
        }
        let parent = parent_dir(&self.current_path);
        self.navigate_to(fs, &parent)
    }

    /// Handles a typed path-bar entry. The path also becomes the working directory.
    pub fn submit_path<F>(&mut self, fs: &mut F, raw: &str) -> Result<(), Notice>
    where
        F: VirtualFsService + ?Sized,
    {
        let raw = raw.trim();
        let resolved = fs.set_cwd(raw).map_err(|err| Notice::error(err.message))?;
        self.navigate_to(&*fs, &resolved)
    }

    /// Applies a click on the `index`-th visible entry.
    pub fn click(&mut self, index: usize, modifier: ClickModifier) {
        let visible = visible_entries(&self.entries, self.show_hidden_files, &self.search);
        self.selection.click(&visible, index, modifier);
    }

    /// Background click.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Opens `name`: folders are entered, supported files open in their app.
    pub fn open_item<H>(&mut self, host: &mut H, name: &str) -> Result<(), Notice>
    where
        H: AppHost + ?Sized,
    {
        self.selection.clear();
        let Some(entry) = self.entry(name) else {
            return Err(Notice::error(format!("Cannot open this file type: {name}")));
        };
        let path = entry.path.clone();
        if entry.is_directory() {
            return self.navigate_to(&*host, &path);
        }
        match app_for_file(name) {
            Some(app_id) => {
                host.open_window(self.window_id, app_id, Some(file_launch_params(&path)));
                Ok(())
            }
            None => Err(Notice::error(format!("Cannot open this file type: {name}"))),
        }
    }

    /// Creates a folder named `name` in the current folder.
    pub fn create_folder<H>(&mut self, host: &mut H, name: &str) -> Notice
    where
        H: AppHost + ?Sized,
    {
        let name = name.trim();
        if name.is_empty() {
            return Notice::error("Folder name cannot be empty.");
        }
        let notice = match host.create_directory(&self.path_of(name)) {
            Ok(_) => Notice::success(format!("Folder '{name}' created.")),
            Err(err) => Notice::error(err.message),
        };
        self.refresh(&*host);
        notice
    }

    /// Creates an empty file named `name` in the current folder.
    pub fn create_file<H>(&mut self, host: &mut H, name: &str) -> Notice
    where
        H: AppHost + ?Sized,
    {
        let name = name.trim();
        if name.is_empty() {
            return Notice::error("File name cannot be empty.");
        }
        let notice = match host.create_file(&self.path_of(name), None) {
            Ok(_) => Notice::success(format!("File '{name}' created.")),
            Err(err) => Notice::error(err.message),
        };
        self.refresh(&*host);
        notice
    }

    /// Renames `name` to `new_name` and selects the renamed entry.
    pub fn rename<H>(&mut self, host: &mut H, name: &str, new_name: &str) -> Notice
    where
        H: AppHost + ?Sized,
    {
        let new_name = new_name.trim();
        match host.rename_item(&self.path_of(name), new_name) {
            Ok(_) => {
                self.refresh(&*host);
                let index = self.visible().iter().position(|e| e.name == new_name);
                self.selection.select_only(new_name, index);
                Notice::success(format!("Renamed to '{new_name}'."))
            }
            Err(err) => Notice::error(err.message),
        }
    }

    /// Deletes every selected entry, best effort. Selection is kept if anything failed.
    pub fn delete_selected<H>(&mut self, host: &mut H) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let names = self.selected_names();
        if names.is_empty() {
            return Vec::new();
        }
        let mut notices = Vec::new();
        let mut deleted = Vec::new();
        for name in &names {
            match host.delete_item(&self.path_of(name)) {
                Ok(()) => deleted.push(name),
                Err(err) => notices.push(Notice::error(err.message)),
            }
        }
        let message = match deleted.as_slice() {
            [] => None,
            [only] => Some(format!("'{only}' deleted.")),
            many => Some(format!("{} items deleted.", many.len())),
        };
        if let Some(message) = message {
            notices.insert(0, Notice::success(message));
        }
        if notices.iter().all(|notice| !notice.is_error()) {
            self.selection.clear();
        }
        self.refresh(&*host);
        notices
    }

    /// Moves `names` into the sibling folder `folder` (drag onto a folder tile).
    ///
    /// Drops onto a non-folder, or of a folder onto itself, are ignored.
    pub fn move_into_folder<H>(
        &mut self,
        host: &mut H,
        names: &[String],
        folder: &str,
    ) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let is_folder = self.entry(folder).is_some_and(FsEntry::is_directory);
        if names.is_empty() || !is_folder || names.iter().any(|name| name == folder) {
            debug!(folder, "explorer drop ignored");
            return Vec::new();
        }
        let destination = self.path_of(folder);
        self.move_batch(host, names, &destination, folder)
    }

    /// Moves the selection into the sibling folder `folder`.
    pub fn move_selected_into<H>(&mut self, host: &mut H, folder: &str) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let names = self.selected_names();
        self.move_into_folder(host, &names, folder)
    }

    /// Moves `names` into an arbitrary folder (drag onto the sidebar tree).
    ///
    /// Drops onto the current folder, or into one of the dragged folders, are ignored.
    pub fn move_to_path<H>(
        &mut self,
        host: &mut H,
        names: &[String],
        destination: &str,
    ) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let into_itself = names.iter().any(|name| self.path_of(name) == destination);
        if names.is_empty() || destination == self.current_path || into_itself {
            debug!(destination, "explorer sidebar drop ignored");
            return Vec::new();
        }
        let label = file_name(destination).unwrap_or("Root").to_string();
        self.move_batch(host, names, destination, &label)
    }

    fn move_batch<H>(
        &mut self,
        host: &mut H,
        names: &[String],
        destination: &str,
        label: &str,
    ) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let mut moved = 0;
        let mut failures = Vec::new();
        for name in names {
            match host.move_item(&self.path_of(name), destination) {
                Ok(_) => moved += 1,
                Err(err) => failures.push(err),
            }
        }

        let mut notices = Vec::new();
        if moved > 0 {
            let message = if moved == 1 && names.len() == 1 {
                format!("Moved '{}' into '{label}'.", names[0])
            } else {
                format!("Moved {moved} item{} into '{label}'.", plural(moved))
            };
            notices.push(Notice::success(message));
        }
        if let Some(first) = failures.first() {
            notices.push(Notice::error(format!(
                "Failed to move {} item{}. ({first})",
                failures.len(),
                plural(failures.len())
            )));
        } else {
            self.selection.clear();
        }
        self.refresh(&*host);
        notices
    }

    /// Puts the selection on the clipboard for copying.
    pub fn copy_selection<H>(&mut self, host: &mut H) -> Option<Notice>
    where
        H: AppHost + ?Sized,
    {
        self.stage_selection(host, ClipboardOperation::Copy)
    }

    /// Puts the selection on the clipboard for moving.
    pub fn cut_selection<H>(&mut self, host: &mut H) -> Option<Notice>
    where
        H: AppHost + ?Sized,
    {
        self.stage_selection(host, ClipboardOperation::Cut)
    }

    fn stage_selection<H>(
        &mut self,
        host: &mut H,
        operation: ClipboardOperation,
    ) -> Option<Notice>
    where
        H: AppHost + ?Sized,
    {
        let paths: Vec<String> = self
            .selected_names()
            .iter()
            .map(|name| self.path_of(name))
            .collect();
        if paths.is_empty() {
            return None;
        }
        let count = paths.len();
        let verb = match operation {
            ClipboardOperation::Copy => "copied",
            ClipboardOperation::Cut => "cut",
        };
        Some(match host.set_clipboard(operation, paths) {
            Ok(()) => Notice::success(format!("{count} item(s) {verb} to clipboard.")),
            Err(err) => Notice::error(err.to_string()),
        })
    }

    /// Pastes the clipboard into the current folder.
    pub fn paste<H>(&mut self, host: &mut H) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let notices = match host.paste(&self.current_path) {
            Ok(report) => report
                .success_message()
                .map(Notice::success)
                .into_iter()
                .chain(report.failure_message().map(Notice::error))
                .collect(),
            Err(err) => vec![Notice::error(err.to_string())],
        };
        self.refresh(&*host);
        notices
    }

    /// Imports files dropped from outside the desktop into the current folder.
    ///
    /// Each failure gets its own notice; the summary counts successes only.
    pub fn import_files<H>(&mut self, host: &mut H, files: &[DroppedFile]) -> Vec<Notice>
    where
        H: AppHost + ?Sized,
    {
        let mut notices = Vec::new();
        let mut added = 0;
        for file in files {
            let result = file.to_new_file().and_then(|new_file| {
                host.create_file(&self.path_of(&file.name), Some(new_file))
                    .map_err(|err| err.message)
            });
            match result {
                Ok(_) => added += 1,
                Err(message) => notices.push(Notice::error(message)),
            }
        }
        if added > 0 {
            notices.push(Notice::success(format!("Successfully added {added} file(s).")));
        }
        debug!(
            window_id = self.window_id,
            added,
            failed = files.len() - added,
            "explorer import finished"
        );
        self.refresh(&*host);
        notices
    }
}
