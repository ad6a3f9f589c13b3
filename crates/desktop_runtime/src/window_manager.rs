//! Shared window-manager transition helpers used by the desktop reducer.

use serde_json::Value;

use crate::apps::app_descriptor;
use crate::model::{AppId, DesktopState, Viewport, WindowId, WindowLayout, WindowRect};

/// Computes the cascaded rect for a new window given how many windows are already open.
///
/// The window is centered in the viewport, shifted by the cascade slot, and kept on screen
/// above the taskbar when it fits.
pub fn cascade_rect(open_count: usize, viewport: Viewport, layout: &WindowLayout) -> WindowRect {
    let slot = (open_count % layout.cascade_slots.max(1)) as i32;
    let offset = slot * layout.cascade_step;
    let (w, h) = (layout.default_width, layout.default_height);
    let centered = WindowRect {
        x: viewport.width / 2 - w / 2,
        y: viewport.height / 2 - h / 2,
        w,
        h,
    }
    .offset(offset, offset);

    let max_x = (viewport.width - w).max(0);
    let max_y = (viewport.height - layout.taskbar_height - h).max(0);
    WindowRect {
        x: centered.x.max(0).min(max_x),
        y: centered.y.max(0).min(max_y),
        ..centered
    }
}

/// Rect of a maximized window: the full viewport minus the taskbar.
pub fn maximized_rect(viewport: Viewport, layout: &WindowLayout) -> WindowRect {
    WindowRect {
        x: 0,
        y: 0,
        w: viewport.width,
        h: (viewport.height - layout.taskbar_height).max(0),
    }
}

/// Title for a newly opened window: `"<file> - <label>"` when launched on a file.
pub fn initial_title(app_id: AppId, context: Option<&Value>) -> String {
    let label = app_descriptor(app_id).label;
    let file = context
        .and_then(|ctx| ctx.get("file_path"))
        .and_then(Value::as_str)
        .and_then(platform_host::file_name);
    match file {
        Some(name) => format!("{name} - {label}"),
        None => label.to_string(),
    }
}

/// Returns the highest-z non-minimized window, optionally ignoring one id.
pub fn topmost_visible(state: &DesktopState, excluding: Option<WindowId>) -> Option<WindowId> {
    state
        .windows
        .iter()
        .filter(|w| !w.minimized && Some(w.id) != excluding)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id)
}

/// Allocates the next z value. Values are never reused.
pub fn next_z_index(state: &mut DesktopState) -> u64 {
    state.highest_z_index = state.highest_z_index.saturating_add(1);
    state.highest_z_index
}

/// Allocates the next window id.
pub fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

/// Gives `window_id` a fresh top z and focus. Returns `false` when the window is missing.
pub fn raise_and_focus(state: &mut DesktopState, window_id: WindowId) -> bool {
    let z = state.highest_z_index.saturating_add(1);
    let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) else {
        return false;
    };
    window.z_index = z;
    state.highest_z_index = z;
    state.active_window_id = Some(window_id);
    true
}
