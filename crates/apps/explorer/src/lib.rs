//! Headless file explorer: listing, selection and file operations for one explorer window.
//!
//! [`ExplorerModel`] holds the per-window view state (current folder, sorted listing, search
//! filter, selection) and performs every user action through an
//! [`desktop_app_contract::AppHost`], returning the [`Notice`]s a front end shows as toasts.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod import;
pub mod listing;
pub mod model;
pub mod routing;
pub mod selection;

pub use import::{data_url, DroppedFile};
pub use listing::{breadcrumbs, visible_entries, Breadcrumb};
pub use model::{ExplorerModel, Notice, NoticeLevel};
pub use routing::{app_for_file, IMAGE_EXTENSIONS};
pub use selection::{ClickModifier, Selection};
