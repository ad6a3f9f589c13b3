//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{
    AppId, CloseConfirmation, DesktopBackground, DesktopSnapshot, DesktopState, ExplorerSettings,
    Point, Theme, Viewport, WindowId, WindowRecord, WindowRect,
};
use crate::window_manager::{
    cascade_rect, initial_title, maximized_rect, next_window_id, next_z_index, raise_and_focus,
    topmost_visible,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window for an app, or restore a minimized one when no context is given.
    OpenWindow {
        /// App to open.
        app_id: AppId,
        /// Opaque per-window launch payload.
        context: Option<Value>,
    },
    /// Close a window, deferring to a confirmation when it has unsaved changes.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Answer the pending close confirmation.
    ResolveCloseConfirmation {
        /// Whether the user agreed to discard changes.
        accepted: bool,
    },
    /// Focus (and raise) a window by id.
    BringToFront {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Move a window's top-left corner.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New position.
        position: Point,
    },
    /// Resize a window.
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// Replace a window's rect in one step.
    ResizeAndMoveWindow {
        /// Window to update.
        window_id: WindowId,
        /// New rect.
        rect: WindowRect,
    },
    /// Minimize or restore a window.
    ToggleMinimize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Maximize or restore a window.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Flag a window as holding unsaved changes.
    MarkWindowDirty {
        /// Window to flag.
        window_id: WindowId,
    },
    /// Clear a window's unsaved-changes flag.
    MarkWindowClean {
        /// Window to clear.
        window_id: WindowId,
    },
    /// Replace a window's title.
    UpdateWindowTitle {
        /// Window to retitle.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// Move a desktop icon.
    MoveIcon {
        /// App whose icon moves.
        app_id: AppId,
        /// New icon position.
        position: Point,
    },
    /// Toggle the start menu, or force it to a given state.
    ToggleStartMenu {
        /// Forced state; `None` toggles.
        force: Option<bool>,
    },
    /// Lock or unlock the taskbar.
    ToggleTaskbarLock,
    /// Pin an app to the taskbar.
    PinApp {
        /// App to pin.
        app_id: AppId,
    },
    /// Unpin an app from the taskbar.
    UnpinApp {
        /// App to unpin.
        app_id: AppId,
    },
    /// Replace the file explorer settings.
    SetExplorerSettings {
        /// New settings.
        settings: ExplorerSettings,
    },
    /// Replace the desktop background.
    SetDesktopBackground {
        /// New background.
        background: DesktopBackground,
    },
    /// Set the color theme.
    SetTheme {
        /// New theme.
        theme: Theme,
    },
    /// Toggle the night light filter.
    ToggleNightLight,
    /// Record a new desktop viewport size.
    SetViewport {
        /// New viewport.
        viewport: Viewport,
    },
    /// Hydrate runtime state from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: Box<DesktopSnapshot>,
    },
}

impl DesktopAction {
    /// Returns `true` for actions that only touch shell settings, not windows.
    pub fn is_settings_action(&self) -> bool {
        matches!(
            self,
            Self::MoveIcon { .. }
                | Self::ToggleStartMenu { .. }
                | Self::ToggleTaskbarLock
                | Self::PinApp { .. }
                | Self::UnpinApp { .. }
                | Self::SetExplorerSettings { .. }
                | Self::SetDesktopBackground { .. }
                | Self::SetTheme { .. }
                | Self::ToggleNightLight
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Persist the current desktop snapshot.
    PersistLayout,
    /// Move keyboard focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Ask the user whether to discard unsaved changes before closing.
    RequestCloseConfirmation(CloseConfirmation),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// No desktop icon exists for the app.
    #[error("no desktop icon for {0}")]
    IconNotFound(AppId),
    /// A close confirmation was answered while none was pending.
    #[error("no close confirmation is pending")]
    NoPendingConfirmation,
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for desktop window management and
/// shell-level preferences.
///
/// # Errors
///
/// Returns [`ReducerError`] when an action references a missing window or icon, or answers a
/// confirmation that was never requested. State is unchanged in that case.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow { app_id, context } => {
            if context.is_none() {
                let minimized = state
                    .windows
                    .iter()
                    .find(|w| w.app_id == app_id && w.minimized)
                    .map(|w| w.id);
                if let Some(window_id) = minimized {
                    debug!(%window_id, %app_id, "reusing minimized window");
                    return reduce_desktop(state, DesktopAction::ToggleMinimize { window_id });
                }
            }

            let window_id = next_window_id(state);
            let z_index = next_z_index(state);
            let rect = cascade_rect(state.windows.len(), state.viewport, &state.layout);
            let title = initial_title(app_id, context.as_ref());
            debug!(%window_id, %app_id, z_index, "opening window");
            state.windows.push(WindowRecord {
                id: window_id,
                app_id,
                title,
                z_index,
                rect,
                minimized: false,
                maximized: false,
                restore_rect: None,
                context,
            });
            state.active_window_id = Some(window_id);
            state.start_menu_open = false;
            effects.push(RuntimeEffect::PersistLayout);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            let window = find_window(state, window_id)?;
            if state.is_dirty(window_id) {
                let confirmation = CloseConfirmation {
                    window_id,
                    title: format!("{} - Unsaved Changes", window.title),
                    message: format!(
                        "Do you want to close without saving changes in {}?",
                        window.title
                    ),
                };
                debug!(%window_id, "close deferred for unsaved changes");
                state.pending_close = Some(confirmation.clone());
                effects.push(RuntimeEffect::RequestCloseConfirmation(confirmation));
            } else {
                perform_close(state, window_id);
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ResolveCloseConfirmation { accepted } => {
            let pending = state
                .pending_close
                .take()
                .ok_or(ReducerError::NoPendingConfirmation)?;
            if accepted && state.window(pending.window_id).is_some() {
                perform_close(state, pending.window_id);
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::BringToFront { window_id } => {
            let window = find_window(state, window_id)?;
            if window.minimized {
                return reduce_desktop(state, DesktopAction::ToggleMinimize { window_id });
            }
            if state.active_window_id != Some(window_id) {
                raise_and_focus(state, window_id);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.maximized {
                window.rect.x = position.x;
                window.rect.y = position.y;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ResizeWindow {
            window_id,
            width,
            height,
        } => {
            let window = find_window_mut(state, window_id)?;
            if !window.maximized {
                window.rect.w = width;
                window.rect.h = height;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ResizeAndMoveWindow { window_id, rect } => {
            let window = find_window_mut(state, window_id)?;
            if !window.maximized {
                window.rect = rect;
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::ToggleMinimize { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.minimized {
                window.minimized = false;
                raise_and_focus(state, window_id);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            } else {
                window.minimized = true;
                if state.active_window_id == Some(window_id) {
                    state.active_window_id = topmost_visible(state, Some(window_id));
                }
            }
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let maximized = maximized_rect(state.viewport, &state.layout);
            let window = find_window_mut(state, window_id)?;
            if window.maximized {
                if let Some(restore_rect) = window.restore_rect.take() {
                    window.rect = restore_rect;
                }
                window.maximized = false;
            } else {
                window.restore_rect = Some(window.rect);
                window.rect = maximized;
                window.maximized = true;
            }
            raise_and_focus(state, window_id);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::MarkWindowDirty { window_id } => {
            find_window(state, window_id)?;
            state.dirty_window_ids.insert(window_id);
        }
        DesktopAction::MarkWindowClean { window_id } => {
            find_window(state, window_id)?;
            state.dirty_window_ids.remove(&window_id);
        }
        DesktopAction::UpdateWindowTitle { window_id, title } => {
            find_window_mut(state, window_id)?.title = title;
        }
        DesktopAction::MoveIcon { app_id, position } => {
            let icon = state
                .icons
                .iter_mut()
                .find(|icon| icon.app_id == app_id)
                .ok_or(ReducerError::IconNotFound(app_id))?;
            icon.position = position;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleStartMenu { force } => {
            state.start_menu_open = force.unwrap_or(!state.start_menu_open);
        }
        DesktopAction::ToggleTaskbarLock => {
            state.taskbar_locked = !state.taskbar_locked;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::PinApp { app_id } => {
            if !state.pinned_app_ids.contains(&app_id) {
                state.pinned_app_ids.push(app_id);
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::UnpinApp { app_id } => {
            let before = state.pinned_app_ids.len();
            state.pinned_app_ids.retain(|id| *id != app_id);
            if state.pinned_app_ids.len() != before {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::SetExplorerSettings { settings } => {
            state.explorer_settings = settings;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetDesktopBackground { background } => {
            state.desktop_background = DesktopBackground::new(background.kind, background.custom_url);
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetTheme { theme } => {
            state.settings.theme = theme;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::ToggleNightLight => {
            state.night_light_enabled = !state.night_light_enabled;
            effects.push(RuntimeEffect::PersistLayout);
        }
        DesktopAction::SetViewport { viewport } => {
            state.viewport = viewport;
        }
        DesktopAction::HydrateSnapshot { snapshot } => {
            state.hydrate(&snapshot);
            info!(
                windows = state.windows.len(),
                next_window_id = state.next_window_id,
                highest_z_index = state.highest_z_index,
                "desktop state hydrated"
            );
        }
    }

    Ok(effects)
}

fn perform_close(state: &mut DesktopState, window_id: WindowId) {
    state.windows.retain(|w| w.id != window_id);
    state.dirty_window_ids.remove(&window_id);
    if state
        .pending_close
        .as_ref()
        .is_some_and(|pending| pending.window_id == window_id)
    {
        state.pending_close = None;
    }
    if state.active_window_id == Some(window_id) {
        state.active_window_id = topmost_visible(state, None);
    }
    debug!(%window_id, active = ?state.active_window_id, "window closed");
}

fn find_window(state: &DesktopState, window_id: WindowId) -> Result<&WindowRecord, ReducerError> {
    state.window(window_id).ok_or(ReducerError::WindowNotFound)
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}
