//! Headless document apps: the text editor and the image viewer.
//!
//! Both read their file through the [`desktop_app_contract::AppHost`] they are mounted in. The
//! text editor additionally reports unsaved changes and title updates back to the window
//! manager.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod editor;
pub mod image_viewer;

pub use editor::{EditorError, TextDocument, UNTITLED_FILE_NAME};
pub use image_viewer::{validate_image_data, ImageError, ImageViewerModel, ViewTransform};
