//! Which app opens a file.

use desktop_app_contract::AppId;

/// Extensions shown in the image viewer.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// App that opens `name`, by case-insensitive extension. `None` means unsupported.
pub fn app_for_file(name: &str) -> Option<AppId> {
    let (_, extension) = name.rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    if extension == "txt" {
        Some(AppId::TextEditor)
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(AppId::ImageViewer)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_extension() {
        assert_eq!(app_for_file("readme.txt"), Some(AppId::TextEditor));
        assert_eq!(app_for_file("NOTES.TXT"), Some(AppId::TextEditor));
        assert_eq!(app_for_file("photo.JPeG"), Some(AppId::ImageViewer));
        assert_eq!(app_for_file("vector.svg"), Some(AppId::ImageViewer));
        assert_eq!(app_for_file("config.sys"), None);
        assert_eq!(app_for_file("Makefile"), None);
    }
}
