//! The desktop store: window-manager state, filesystem and clipboard behind one owner.

use std::collections::BTreeMap;

use desktop_app_contract::{AppCommand, AppHost, AppLaunchContext, WindowRuntimeId};
use desktop_vfs::{
    Clipboard, ClipboardController, ClipboardError, ClipboardOperation, PasteReport, VirtualFs,
};
use platform_host::{FsEntry, FsResult, NewFile, SnapshotStore, VirtualFsService};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DesktopConfig;
use crate::model::{AppId, CloseConfirmation, DesktopSnapshot, DesktopState, WindowId};
use crate::persistence::{persist_desktop_snapshot, PersistenceError};
use crate::reducer::{reduce_desktop, DesktopAction, RuntimeEffect};

#[derive(Debug, Clone, PartialEq)]
/// Change notifications delivered to store subscribers.
pub enum StoreEvent {
    /// Window collection, focus or dirty flags changed.
    WindowsChanged,
    /// Shell settings (icons, pins, theme, ...) changed.
    SettingsChanged,
    /// The filesystem tree or working directory changed.
    FilesystemChanged,
    /// Clipboard content was set or cleared.
    ClipboardChanged,
    /// A dirty window asked to close and is waiting for an answer.
    CloseConfirmationRequested(CloseConfirmation),
    /// State was replaced from a snapshot.
    Hydrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Handle returned by [`DesktopStore::subscribe`].
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Owns the desktop state, the virtual filesystem and the clipboard.
///
/// Every mutation goes through the store so subscribers see one [`StoreEvent`] per change. The
/// store also implements [`AppHost`], which is how app models talk to it.
pub struct DesktopStore {
    state: DesktopState,
    fs: VirtualFs,
    clipboard: ClipboardController,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: u64,
    persist_requested: bool,
}

impl Default for DesktopStore {
    fn default() -> Self {
        Self::new(&DesktopConfig::default())
    }
}

impl DesktopStore {
    /// Creates a store over the seed filesystem.
    pub fn new(config: &DesktopConfig) -> Self {
        Self::with_parts(
            DesktopState::new(config.viewport, config.windows),
            VirtualFs::seeded(),
        )
    }

    /// Creates a store over explicit state and filesystem.
    pub fn with_parts(state: DesktopState, fs: VirtualFs) -> Self {
        Self {
            state,
            fs,
            clipboard: ClipboardController::default(),
            subscribers: Vec::new(),
            next_subscription_id: 1,
            persist_requested: false,
        }
    }

    /// Creates a store and hydrates it from `snapshot`.
    pub fn from_snapshot(config: &DesktopConfig, snapshot: DesktopSnapshot) -> Self {
        let mut store = Self::new(config);
        store.hydrate(snapshot);
        store.persist_requested = false;
        store
    }

    /// Current window-manager state.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// The owned filesystem.
    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    /// The shared clipboard.
    pub fn clipboard_controller(&self) -> &ClipboardController {
        &self.clipboard
    }

    /// Registers a callback for every [`StoreEvent`].
    pub fn subscribe(&mut self, subscriber: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    /// Applies a reducer action and notifies subscribers.
    ///
    /// Actions that reference missing windows are logged and ignored, leaving state untouched.
    pub fn dispatch_action(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        let is_settings = action.is_settings_action();
        let effects = match reduce_desktop(&mut self.state, action) {
            Ok(effects) => effects,
            Err(err) => {
                warn!("desktop action ignored: {err}");
                return Vec::new();
            }
        };

        if effects.contains(&RuntimeEffect::PersistLayout) {
            self.persist_requested = true;
        }
        self.emit(if is_settings {
            StoreEvent::SettingsChanged
        } else {
            StoreEvent::WindowsChanged
        });
        for effect in &effects {
            if let RuntimeEffect::RequestCloseConfirmation(confirmation) = effect {
                self.emit(StoreEvent::CloseConfirmationRequested(confirmation.clone()));
            }
        }
        effects
    }

    /// Opens (or restores) an app window and returns the focused window id.
    pub fn open_window(&mut self, app_id: AppId, context: Option<Value>) -> Option<WindowId> {
        self.dispatch_action(DesktopAction::OpenWindow { app_id, context });
        self.state.active_window_id
    }

    /// Requests a close. Returns `true` when the window is gone afterwards.
    pub fn close_window(&mut self, window_id: WindowId) -> bool {
        self.dispatch_action(DesktopAction::CloseWindow { window_id });
        self.state.window(window_id).is_none()
    }

    /// Answers the pending close confirmation, closing the window when `accepted`.
    pub fn resolve_close_confirmation(&mut self, accepted: bool) {
        self.dispatch_action(DesktopAction::ResolveCloseConfirmation { accepted });
    }

    /// Launch data for the app hosted in `window_id`.
    pub fn launch_context(&self, window_id: WindowId) -> Option<AppLaunchContext> {
        let window = self.state.window(window_id)?;
        Some(AppLaunchContext::new(
            window.app_id,
            window.id.0,
            window.context.clone(),
        ))
    }

    fn mutate_fs<T>(&mut self, op: impl FnOnce(&mut VirtualFs) -> FsResult<T>) -> FsResult<T> {
        let before = self.fs.revision();
        let result = op(&mut self.fs);
        if self.fs.revision() != before {
            self.persist_requested = true;
            self.emit(StoreEvent::FilesystemChanged);
        }
        result
    }

    /// Empties the clipboard.
    pub fn clear_clipboard(&mut self) {
        if !self.clipboard.is_empty() {
            self.clipboard.clear();
            self.emit(StoreEvent::ClipboardChanged);
        }
    }

    /// Captures the persisted portion of the store.
    pub fn snapshot(&self) -> DesktopSnapshot {
        self.state.snapshot(self.fs.root().clone(), self.fs.cwd())
    }

    /// Replaces state and filesystem from `snapshot`. The clipboard is cleared.
    pub fn hydrate(&mut self, snapshot: DesktopSnapshot) {
        self.fs = VirtualFs::from_parts(snapshot.fs.clone(), snapshot.cwd.clone());
        self.clipboard.clear();
        self.dispatch_action(DesktopAction::HydrateSnapshot {
            snapshot: Box::new(snapshot),
        });
        self.emit(StoreEvent::Hydrated);
    }

    /// Returns whether a persist was requested since the last call, and resets the flag.
    pub fn take_persist_request(&mut self) -> bool {
        std::mem::take(&mut self.persist_requested)
    }

    /// Persists the current snapshot through `store`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the snapshot store fails.
    pub async fn save(&mut self, store: &dyn SnapshotStore) -> Result<(), PersistenceError> {
        let snapshot = self.snapshot();
        persist_desktop_snapshot(store, &snapshot).await?;
        self.persist_requested = false;
        debug!("desktop snapshot saved");
        Ok(())
    }
}

impl VirtualFsService for DesktopStore {
    fn cwd(&self) -> String {
        self.fs.cwd()
    }

    fn set_cwd(&mut self, path: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.set_cwd(path))
    }

    fn list_directory(&self, path: Option<&str>) -> FsResult<BTreeMap<String, FsEntry>> {
        self.fs.list_directory(path)
    }

    fn stat(&self, path: &str) -> FsResult<FsEntry> {
        self.fs.stat(path)
    }

    fn create_directory(&mut self, path: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.create_directory(path))
    }

    fn create_file(&mut self, path: &str, file: Option<NewFile>) -> FsResult<String> {
        self.mutate_fs(|fs| fs.create_file(path, file))
    }

    fn delete_item(&mut self, path: &str) -> FsResult<()> {
        self.mutate_fs(|fs| fs.delete_item(path))
    }

    fn rename_item(&mut self, path: &str, new_name: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.rename_item(path, new_name))
    }

    fn move_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.move_item(source, destination))
    }

    fn copy_item(&mut self, source: &str, destination: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.copy_item(source, destination))
    }

    fn write_file(&mut self, path: &str, content: &str) -> FsResult<String> {
        self.mutate_fs(|fs| fs.write_file(path, content))
    }

    fn read_file(&self, path: &str) -> FsResult<String> {
        self.fs.read_file(path)
    }
}

impl AppHost for DesktopStore {
    fn dispatch(&mut self, window_id: WindowRuntimeId, command: AppCommand) {
        let window_id = WindowId(window_id);
        let action = match command {
            AppCommand::SetWindowTitle { title } => {
                DesktopAction::UpdateWindowTitle { window_id, title }
            }
            AppCommand::MarkDirty => DesktopAction::MarkWindowDirty { window_id },
            AppCommand::MarkClean => DesktopAction::MarkWindowClean { window_id },
            AppCommand::OpenWindow { app_id, context } => {
                DesktopAction::OpenWindow { app_id, context }
            }
        };
        self.dispatch_action(action);
    }

    fn clipboard(&self) -> Option<Clipboard> {
        self.clipboard.content().cloned()
    }

    fn set_clipboard(
        &mut self,
        operation: ClipboardOperation,
        paths: Vec<String>,
    ) -> Result<(), ClipboardError> {
        self.clipboard.set(operation, paths)?;
        self.emit(StoreEvent::ClipboardChanged);
        Ok(())
    }

    fn paste(&mut self, destination: &str) -> Result<PasteReport, ClipboardError> {
        let before = self.fs.revision();
        let report = self.clipboard.paste(&mut self.fs, destination)?;
        if self.fs.revision() != before {
            self.persist_requested = true;
            self.emit(StoreEvent::FilesystemChanged);
        }
        if report.clipboard_cleared {
            self.emit(StoreEvent::ClipboardChanged);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn recording_store() -> (DesktopStore, Rc<RefCell<Vec<StoreEvent>>>) {
        let mut store = DesktopStore::default();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (store, events)
    }

    #[test]
    fn subscribers_see_window_and_settings_events() {
        let (mut store, events) = recording_store();
        store.open_window(AppId::Terminal, None);
        store.dispatch_action(DesktopAction::ToggleNightLight);
        assert_eq!(
            *events.borrow(),
            vec![StoreEvent::WindowsChanged, StoreEvent::SettingsChanged]
        );
        assert!(store.take_persist_request());
        assert!(!store.take_persist_request());
    }

    #[test]
    fn missing_window_actions_are_swallowed_silently() {
        let (mut store, events) = recording_store();
        let effects = store.dispatch_action(DesktopAction::BringToFront {
            window_id: WindowId(7),
        });
        assert!(effects.is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn failed_fs_operations_do_not_notify() {
        let (mut store, events) = recording_store();
        assert!(store.create_directory("/nope/dir").is_err());
        assert!(events.borrow().is_empty());

        store.create_directory("/home/new").expect("mkdir");
        assert_eq!(*events.borrow(), vec![StoreEvent::FilesystemChanged]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut store = DesktopStore::default();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.set_cwd("/system").expect("cd");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_cwd("/home").expect("cd");
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn app_commands_route_to_window_actions() {
        let (mut store, events) = recording_store();
        let window = store
            .open_window(
                AppId::TextEditor,
                Some(json!({ "file_path": "/home/readme.txt" })),
            )
            .expect("window");

        store.update_window_title(window.0, "readme.txt* - Text Editor");
        store.mark_window_dirty(window.0);
        assert!(store.state().is_dirty(window));
        assert_eq!(
            store.state().window(window).expect("window").title,
            "readme.txt* - Text Editor"
        );

        assert!(!store.close_window(window));
        assert!(matches!(
            events.borrow().last(),
            Some(StoreEvent::CloseConfirmationRequested(_))
        ));
        store.resolve_close_confirmation(true);
        assert!(store.state().windows.is_empty());

        let ctx = store.launch_context(window);
        assert_eq!(ctx, None);
    }

    #[test]
    fn launch_context_carries_window_payload() {
        let mut store = DesktopStore::default();
        let window = store
            .open_window(
                AppId::ImageViewer,
                Some(json!({ "file_path": "/home/image.png" })),
            )
            .expect("window");
        let ctx = store.launch_context(window).expect("context");
        assert_eq!(ctx.app_id, AppId::ImageViewer);
        assert_eq!(ctx.window_id, window.0);
        assert_eq!(ctx.file_path(), Some("/home/image.png"));
    }

    #[test]
    fn paste_notifies_filesystem_and_clipboard() {
        let (mut store, events) = recording_store();
        store
            .set_clipboard(ClipboardOperation::Cut, vec!["/home/readme.txt".to_string()])
            .expect("cut");
        let report = store.paste("/system").expect("paste");
        assert!(report.clipboard_cleared);
        assert!(store.exists("/system/readme.txt"));
        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::ClipboardChanged,
                StoreEvent::FilesystemChanged,
                StoreEvent::ClipboardChanged
            ]
        );
        assert_eq!(store.paste("/home"), Err(ClipboardError::Empty));
    }

    #[test]
    fn snapshot_round_trip_restores_fs_and_windows_but_not_clipboard() {
        let mut store = DesktopStore::default();
        store.open_window(AppId::Terminal, None);
        store.write_file("/home/todo.txt", "milk").expect("write");
        store.set_cwd("/system").expect("cd");
        store
            .set_clipboard(ClipboardOperation::Copy, vec!["/home/todo.txt".to_string()])
            .expect("copy");

        let snapshot = store.snapshot();
        let restored = DesktopStore::from_snapshot(&DesktopConfig::default(), snapshot);
        assert_eq!(restored.read_file("/home/todo.txt").expect("read"), "milk");
        assert_eq!(restored.cwd(), "/system");
        assert_eq!(restored.state().windows.len(), 1);
        assert!(restored.clipboard().is_none());
        assert_eq!(restored.state().next_window_id, 2);
    }
}
