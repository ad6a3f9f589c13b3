//! Line-oriented shell over a desktop store and one terminal session.

use desktop_app_contract::file_launch_params;
use desktop_app_terminal::completion::layout_matches;
use desktop_app_terminal::{Completion, TerminalSession};
use desktop_runtime::{
    load_boot_snapshot, AppId, DesktopAction, DesktopConfig, DesktopStore, WindowId,
    WindowRecord,
};
use futures::executor::block_on;
use platform_host::{JsonFileSnapshotStore, VirtualFsService, DESKTOP_STATE_NAMESPACE};
use tracing::{info, warn};

use crate::args::CliArgs;
use crate::CliError;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const META_HELP: [&str; 13] = [
    "Window commands:",
    "  :windows              - List open windows, topmost first",
    "  :open <app> [file]    - Open an app window (file-explorer, terminal, settings, text-editor, image-viewer)",
    "  :close <id>           - Close a window",
    "  :confirm yes|no       - Answer a pending close confirmation",
    "  :focus <id>           - Bring a window to the front",
    "  :minimize <id>        - Minimize or restore a window",
    "  :maximize <id>        - Maximize or restore a window",
    "  :clipboard            - Show the clipboard",
    "  :complete <text>      - Tab-complete text; repeat to list candidates",
    "  :history              - Show command history",
    "  :save                 - Save the snapshot now",
    "  :quit                 - Save and exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether the read loop should keep going.
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop reading.
    Exit,
}

/// Desktop store, terminal session and optional snapshot directory.
pub struct DesktopShell {
    store: DesktopStore,
    terminal: TerminalSession,
    terminal_window: Option<WindowId>,
    snapshots: Option<JsonFileSnapshotStore>,
}

impl DesktopShell {
    /// Loads config and the saved snapshot (unless `--fresh`) and opens a terminal window.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when the config file is unreadable or invalid. A snapshot
    /// that fails to load is logged and the seed desktop is used instead.
    pub fn boot(args: &CliArgs) -> Result<Self, CliError> {
        let config = match &args.config {
            Some(path) => DesktopConfig::load(path)?,
            None => DesktopConfig::default(),
        };
        let snapshots = args
            .snapshot
            .as_ref()
            .map(|dir| JsonFileSnapshotStore::new(dir.clone()));
        let saved = match &snapshots {
            Some(store) if !args.fresh => block_on(load_boot_snapshot(store)),
            _ => None,
        };
        let store = match saved {
            Some(snapshot) => {
                info!(windows = snapshot.windows.len(), "restored desktop snapshot");
                DesktopStore::from_snapshot(&config, snapshot)
            }
            None => DesktopStore::new(&config),
        };
        Ok(Self::new(store, &config, snapshots))
    }

    /// Wraps an existing store and focuses its terminal window, opening one if needed.
    pub fn new(
        mut store: DesktopStore,
        config: &DesktopConfig,
        snapshots: Option<JsonFileSnapshotStore>,
    ) -> Self {
        let existing = store
            .state()
            .windows
            .iter()
            .find(|window| window.app_id == AppId::Terminal)
            .map(|window| (window.id, window.minimized));
        let terminal_window = match existing {
            Some((window_id, true)) => {
                store.dispatch_action(DesktopAction::ToggleMinimize { window_id });
                Some(window_id)
            }
            Some((window_id, false)) => {
                store.dispatch_action(DesktopAction::BringToFront { window_id });
                Some(window_id)
            }
            None => store.open_window(AppId::Terminal, None),
        };
        Self {
            store,
            terminal: TerminalSession::with_history_limit(config.terminal.history_limit),
            terminal_window,
            snapshots,
        }
    }

    /// The desktop store.
    pub fn store(&self) -> &DesktopStore {
        &self.store
    }

    /// The terminal session fed by non-`:` lines.
    pub fn terminal(&self) -> &TerminalSession {
        &self.terminal
    }

    /// Text printed once at startup.
    pub fn banner(&self) -> String {
        let mut banner: String = self
            .terminal
            .lines()
            .iter()
            .map(|line| format!("{}\n", line.text))
            .collect();
        banner.push_str("Window commands start with `:`; try `:help`.\n");
        banner
    }

    /// Prompt for the next line, e.g. `/home$ `.
    pub fn prompt(&self) -> String {
        TerminalSession::prompt(&self.store.cwd())
    }

    /// Runs one input line and returns the lines to print.
    pub fn handle_line(&mut self, line: &str) -> (Vec<String>, Flow) {
        let trimmed = line.trim();
        let (mut printed, flow) = match trimmed.strip_prefix(':') {
            Some(meta) => self.handle_meta(meta),
            None => (self.run_terminal(trimmed), Flow::Continue),
        };
        if flow == Flow::Continue {
            printed.extend(self.autosave());
        }
        (printed, flow)
    }

    fn run_terminal(&mut self, line: &str) -> Vec<String> {
        let output = self.terminal.run(&mut self.store, line);
        if output.cleared {
            return vec![CLEAR_SCREEN.to_string()];
        }
        output.lines.into_iter().map(|line| line.text).collect()
    }

    fn handle_meta(&mut self, meta: &str) -> (Vec<String>, Flow) {
        let mut words = meta.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let printed = match (command, args.as_slice()) {
            ("help", _) => META_HELP.iter().map(|line| line.to_string()).collect(),
            ("quit" | "q", _) => return (Vec::new(), Flow::Exit),
            ("windows", _) => self.list_windows(),
            ("open", [app, rest @ ..]) => self.open(app, rest.first().copied()),
            ("close", [id]) => self.with_window(id, |shell, window_id| shell.close(window_id)),
            ("confirm", [answer]) => self.confirm(answer),
            ("focus", [id]) => self.with_window(id, |shell, window_id| {
                shell.store.dispatch_action(DesktopAction::BringToFront { window_id });
                vec![format!("focused window {window_id}")]
            }),
            ("minimize", [id]) => self.with_window(id, |shell, window_id| {
                shell.store.dispatch_action(DesktopAction::ToggleMinimize { window_id });
                vec![shell.describe(window_id)]
            }),
            ("maximize", [id]) => self.with_window(id, |shell, window_id| {
                shell.store.dispatch_action(DesktopAction::ToggleMaximize { window_id });
                vec![shell.describe(window_id)]
            }),
            ("clipboard", _) => self.show_clipboard(),
            ("complete", _) => self.complete(meta.trim_start()["complete".len()..].trim_start()),
            ("history", _) => self
                .terminal
                .history()
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| format!("{:>5}  {entry}", index + 1))
                .collect(),
            ("save", _) => vec![self.save_now()],
            (other, _) => vec![format!("Unknown window command: :{other} (try :help)")],
        };
        (printed, Flow::Continue)
    }

    fn with_window(
        &mut self,
        raw: &str,
        action: impl FnOnce(&mut Self, WindowId) -> Vec<String>,
    ) -> Vec<String> {
        match raw.parse::<u64>().map(WindowId) {
            Ok(window_id) if self.store.state().window(window_id).is_some() => {
                action(self, window_id)
            }
            _ => vec![format!("No window with id {raw}")],
        }
    }

    fn describe(&self, window_id: WindowId) -> String {
        match self.store.state().window(window_id) {
            Some(window) => self.window_line(window),
            None => format!("window {window_id} is closed"),
        }
    }

    fn window_line(&self, window: &WindowRecord) -> String {
        let state = self.store.state();
        let focus = if state.active_window_id == Some(window.id) {
            '*'
        } else {
            ' '
        };
        let mut flags = Vec::new();
        if window.minimized {
            flags.push("minimized");
        }
        if window.maximized {
            flags.push("maximized");
        }
        if state.is_dirty(window.id) {
            flags.push("unsaved");
        }
        if self.terminal_window == Some(window.id) {
            flags.push("this terminal");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        format!(
            "{focus}{:>3} {:<13} z={:<3} {}{flags}",
            window.id.0,
            window.app_id.as_str(),
            window.z_index,
            window.title
        )
    }

    fn list_windows(&self) -> Vec<String> {
        let mut windows: Vec<&WindowRecord> = self.store.state().windows.iter().collect();
        if windows.is_empty() {
            return vec!["(no windows)".to_string()];
        }
        windows.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        windows.into_iter().map(|w| self.window_line(w)).collect()
    }

    fn open(&mut self, app: &str, file: Option<&str>) -> Vec<String> {
        let Some(app_id) = AppId::parse(app) else {
            return vec![format!("Unknown app: {app}")];
        };
        let context = match file {
            Some(path) => match self.store.stat(path) {
                Ok(entry) => Some(file_launch_params(&entry.path)),
                Err(err) => return vec![err.message],
            },
            None => None,
        };
        match self.store.open_window(app_id, context) {
            Some(window_id) => vec![self.describe(window_id)],
            None => vec![format!("Could not open {app_id}")],
        }
    }

    fn close(&mut self, window_id: WindowId) -> Vec<String> {
        if self.store.close_window(window_id) {
            return vec![format!("closed window {window_id}")];
        }
        match &self.store.state().pending_close {
            Some(pending) => vec![
                pending.message.clone(),
                "Answer with :confirm yes|no".to_string(),
            ],
            None => vec![format!("window {window_id} is still open")],
        }
    }

    fn confirm(&mut self, answer: &str) -> Vec<String> {
        let Some(pending) = self.store.state().pending_close.clone() else {
            return vec!["Nothing is waiting for confirmation".to_string()];
        };
        let accepted = matches!(answer, "yes" | "y");
        self.store.resolve_close_confirmation(accepted);
        if accepted {
            vec![format!("closed window {}", pending.window_id)]
        } else {
            vec![format!("kept window {}", pending.window_id)]
        }
    }

    fn show_clipboard(&self) -> Vec<String> {
        match self.store.clipboard_controller().content() {
            Some(clipboard) => clipboard
                .paths
                .iter()
                .map(|path| format!("{} {path}", clipboard.operation.verb()))
                .collect(),
            None => vec!["(clipboard is empty)".to_string()],
        }
    }

    fn complete(&mut self, text: &str) -> Vec<String> {
        // Keep completer state across repeated requests for the same text.
        if self.terminal.input() != text {
            self.terminal.set_input(text);
        }
        match self.terminal.complete(&self.store) {
            Completion::Completed(input) => vec![input],
            Completion::Listed(matches) => layout_matches(&matches),
            Completion::Ambiguous => vec!["(ambiguous; repeat to list candidates)".to_string()],
            Completion::NoMatch => vec!["(no match)".to_string()],
        }
    }

    fn save_now(&mut self) -> String {
        let Some(snapshots) = &self.snapshots else {
            return "No snapshot directory configured (use --snapshot <dir>)".to_string();
        };
        match block_on(self.store.save(snapshots)) {
            Ok(()) => format!(
                "Snapshot saved to {}",
                snapshots.path_for(DESKTOP_STATE_NAMESPACE).display()
            ),
            Err(err) => format!("Snapshot save failed: {err}"),
        }
    }

    fn autosave(&mut self) -> Option<String> {
        if !self.store.take_persist_request() {
            return None;
        }
        let snapshots = self.snapshots.as_ref()?;
        match block_on(self.store.save(snapshots)) {
            Ok(()) => None,
            Err(err) => {
                warn!("autosave failed: {err}");
                Some(format!("Snapshot save failed: {err}"))
            }
        }
    }

    /// Saves the snapshot one last time when a snapshot directory is configured.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Persistence`] when the save fails.
    pub fn shutdown(&mut self) -> Result<(), CliError> {
        if let Some(snapshots) = &self.snapshots {
            block_on(self.store.save(snapshots))?;
        }
        Ok(())
    }
}
