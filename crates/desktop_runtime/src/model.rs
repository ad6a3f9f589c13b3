use std::collections::BTreeSet;

use platform_host::FsNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use desktop_app_contract::AppId;

use crate::apps::default_desktop_icons;

pub const DESKTOP_LAYOUT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
pub const TASKBAR_HEIGHT: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Folder,
    Terminal,
    Settings,
    FileText,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Size of the desktop surface that windows are laid out in.
pub struct Viewport {
    /// Width in px.
    pub width: i32,
    /// Height in px, including the taskbar.
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Window placement policy applied by the reducer.
pub struct WindowLayout {
    /// Width of newly opened windows.
    pub default_width: i32,
    /// Height of newly opened windows.
    pub default_height: i32,
    /// Offset in px between consecutive cascade slots.
    pub cascade_step: i32,
    /// Number of cascade slots before positions wrap around.
    pub cascade_slots: usize,
    /// Height reserved for the taskbar when maximizing.
    pub taskbar_height: i32,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WINDOW_WIDTH,
            default_height: DEFAULT_WINDOW_HEIGHT,
            cascade_step: 30,
            cascade_slots: 5,
            taskbar_height: TASKBAR_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub z_index: u64,
    pub rect: WindowRect,
    pub minimized: bool,
    pub maximized: bool,
    pub restore_rect: Option<WindowRect>,
    pub context: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub app_id: AppId,
    pub label: String,
    pub icon: IconKind,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplorerView {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExplorerSettings {
    pub default_view: ExplorerView,
    pub show_hidden_files: bool,
}

pub const CUSTOM_IMAGE_BACKGROUND: &str = "custom-image";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopBackground {
    pub kind: String,
    pub custom_url: Option<String>,
}

impl DesktopBackground {
    /// Builds a background, dropping `custom_url` unless `kind` is a custom image.
    pub fn new(kind: impl Into<String>, custom_url: Option<String>) -> Self {
        let kind = kind.into();
        let custom_url = custom_url.filter(|_| kind == CUSTOM_IMAGE_BACKGROUND);
        Self { kind, custom_url }
    }
}

impl Default for DesktopBackground {
    fn default() -> Self {
        Self {
            kind: "gradient-1".to_string(),
            custom_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A close request waiting on the user because the window has unsaved changes.
pub struct CloseConfirmation {
    pub window_id: WindowId,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: Vec<WindowRecord>,
    pub active_window_id: Option<WindowId>,
    pub icons: Vec<DesktopIcon>,
    pub pinned_app_ids: Vec<AppId>,
    pub start_menu_open: bool,
    pub taskbar_locked: bool,
    pub night_light_enabled: bool,
    pub explorer_settings: ExplorerSettings,
    pub desktop_background: DesktopBackground,
    pub settings: GeneralSettings,
    pub dirty_window_ids: BTreeSet<WindowId>,
    pub pending_close: Option<CloseConfirmation>,
    pub viewport: Viewport,
    pub layout: WindowLayout,
    pub next_window_id: u64,
    pub highest_z_index: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(Viewport::default(), WindowLayout::default())
    }
}

impl DesktopState {
    pub fn new(viewport: Viewport, layout: WindowLayout) -> Self {
        Self {
            windows: Vec::new(),
            active_window_id: None,
            icons: default_desktop_icons(),
            pinned_app_ids: vec![AppId::FileExplorer, AppId::Terminal],
            start_menu_open: false,
            taskbar_locked: false,
            night_light_enabled: false,
            explorer_settings: ExplorerSettings::default(),
            desktop_background: DesktopBackground::default(),
            settings: GeneralSettings::default(),
            dirty_window_ids: BTreeSet::new(),
            pending_close: None,
            viewport,
            layout,
            next_window_id: 1,
            highest_z_index: 0,
        }
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn is_dirty(&self, window_id: WindowId) -> bool {
        self.dirty_window_ids.contains(&window_id)
    }

    /// Non-minimized windows ordered back to front.
    pub fn visible_stack(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<_> = self.windows.iter().filter(|w| !w.minimized).collect();
        visible.sort_by_key(|w| w.z_index);
        visible
    }

    pub fn snapshot(&self, fs: FsNode, cwd: String) -> DesktopSnapshot {
        DesktopSnapshot {
            schema_version: DESKTOP_LAYOUT_SCHEMA_VERSION,
            icons: self.icons.clone(),
            windows: self.windows.clone(),
            active_window_id: self.active_window_id,
            fs,
            cwd,
            explorer_settings: self.explorer_settings,
            desktop_background: self.desktop_background.clone(),
            pinned_app_ids: self.pinned_app_ids.clone(),
            settings: self.settings,
            taskbar_locked: self.taskbar_locked,
            night_light_enabled: self.night_light_enabled,
        }
    }

    /// Replaces persisted fields from `snapshot` and recomputes the id and z counters.
    ///
    /// Viewport and layout are kept; transient state (dirty flags, pending close, start menu)
    /// is reset.
    pub fn hydrate(&mut self, snapshot: &DesktopSnapshot) {
        let mut state = Self::new(self.viewport, self.layout);
        state.icons = snapshot.icons.clone();
        state.windows = snapshot.windows.clone();
        state.explorer_settings = snapshot.explorer_settings;
        state.desktop_background = snapshot.desktop_background.clone();
        state.pinned_app_ids = snapshot.pinned_app_ids.clone();
        state.settings = snapshot.settings;
        state.taskbar_locked = snapshot.taskbar_locked;
        state.night_light_enabled = snapshot.night_light_enabled;
        state.next_window_id = state
            .windows
            .iter()
            .map(|w| w.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        state.highest_z_index = state.windows.iter().map(|w| w.z_index).max().unwrap_or(0);
        state.active_window_id = snapshot
            .active_window_id
            .filter(|id| state.window(*id).is_some_and(|w| !w.minimized))
            .or_else(|| crate::window_manager::topmost_visible(&state, None));
        *self = state;
    }

    pub fn from_snapshot(snapshot: &DesktopSnapshot) -> Self {
        let mut state = Self::default();
        state.hydrate(snapshot);
        state
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopSnapshot {
    pub schema_version: u32,
    pub icons: Vec<DesktopIcon>,
    pub windows: Vec<WindowRecord>,
    pub active_window_id: Option<WindowId>,
    pub fs: FsNode,
    pub cwd: String,
    pub explorer_settings: ExplorerSettings,
    pub desktop_background: DesktopBackground,
    pub pinned_app_ids: Vec<AppId>,
    pub settings: GeneralSettings,
    pub taskbar_locked: bool,
    pub night_light_enabled: bool,
}
