//! Static app registry: labels, icon kinds and default desktop placement.

use crate::model::{AppId, DesktopIcon, IconKind, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Static metadata for one installed app.
pub struct AppDescriptor {
    pub app_id: AppId,
    pub label: &'static str,
    pub icon: IconKind,
    pub desktop_position: Point,
    pub show_on_desktop: bool,
}

const APP_REGISTRY: [AppDescriptor; 5] = [
    AppDescriptor {
        app_id: AppId::FileExplorer,
        label: "File Explorer",
        icon: IconKind::Folder,
        desktop_position: Point { x: 20, y: 20 },
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::Terminal,
        label: "Terminal",
        icon: IconKind::Terminal,
        desktop_position: Point { x: 20, y: 130 },
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::Settings,
        label: "Settings",
        icon: IconKind::Settings,
        desktop_position: Point { x: 20, y: 240 },
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::TextEditor,
        label: "Text Editor",
        icon: IconKind::FileText,
        desktop_position: Point { x: 120, y: 20 },
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: AppId::ImageViewer,
        label: "Image Viewer",
        icon: IconKind::Image,
        desktop_position: Point { x: 120, y: 130 },
        show_on_desktop: true,
    },
];

pub fn app_registry() -> &'static [AppDescriptor] {
    &APP_REGISTRY
}

/// Registry entry for `app_id`.
pub fn app_descriptor(app_id: AppId) -> &'static AppDescriptor {
    // The registry covers every `AppId` variant; the match keeps that checked at compile time.
    match app_id {
        AppId::FileExplorer => &APP_REGISTRY[0],
        AppId::Terminal => &APP_REGISTRY[1],
        AppId::Settings => &APP_REGISTRY[2],
        AppId::TextEditor => &APP_REGISTRY[3],
        AppId::ImageViewer => &APP_REGISTRY[4],
    }
}

/// Desktop icons in their initial positions.
pub fn default_desktop_icons() -> Vec<DesktopIcon> {
    app_registry()
        .iter()
        .filter(|entry| entry.show_on_desktop)
        .map(|entry| DesktopIcon {
            app_id: entry.app_id,
            label: entry.label.to_string(),
            icon: entry.icon,
            position: entry.desktop_position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lookup_matches_registry_order() {
        for app in AppId::ALL {
            assert_eq!(app_descriptor(app).app_id, app);
        }
    }

    #[test]
    fn default_icons_resolve_static_icon_kinds() {
        let icons = default_desktop_icons();
        assert_eq!(icons.len(), 5);
        assert_eq!(icons[0].icon, IconKind::Folder);
        assert_eq!(icons[3].label, "Text Editor");
        assert_eq!(icons[4].position, Point { x: 120, y: 130 });
    }
}
