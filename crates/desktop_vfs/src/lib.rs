//! In-memory virtual filesystem engine for the simulated desktop.
//!
//! [`VirtualFs`] owns a single tree of [`platform_host::FsNode`] values plus the process-wide
//! working directory, and implements [`platform_host::VirtualFsService`]. Every operation
//! validates its preconditions before touching the tree, so a failed call never leaves partial
//! state behind. [`ClipboardController`] layers cut/copy/paste on top of any service
//! implementation.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod clipboard;
pub mod engine;
pub mod lookup;
pub mod naming;
pub mod report;
pub mod seed;

pub use clipboard::{
    Clipboard, ClipboardController, ClipboardError, ClipboardOperation, PasteReport,
};
pub use engine::VirtualFs;
pub use lookup::{get_dir, get_dir_mut, get_node, get_node_mut};
pub use naming::{split_extension, unique_copy_name, MAX_COPY_NAME_ATTEMPTS};
pub use report::{BatchFailure, BatchItem, BatchReport};
pub use seed::{seed_tree, SEED_CWD};
