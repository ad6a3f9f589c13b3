//! Typed host-domain contracts and shared models used by the desktop runtime and its apps.
//!
//! This crate is the API-first boundary for the simulated filesystem and snapshot persistence.
//! It exposes virtual path resolution, filesystem node/entry models, the [`VirtualFsService`]
//! contract, time helpers, and snapshot storage traits. The in-memory engine lives in
//! `desktop_vfs` and window-manager state lives in `desktop_runtime`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod fs;
pub mod storage;
pub mod time;

pub use fs::error::{FsError, FsErrorKind, FsResult};
pub use fs::path::{
    file_name, is_within, join_path, parent_dir, path_segments, resolve_path, split_parent,
    ROOT_PATH,
};
pub use fs::service::{NewFile, NoopVirtualFsService, VirtualFsService};
pub use fs::types::{sort_entries, FsEntry, FsEntryKind, FsNode};
pub use storage::snapshot::{
    build_snapshot_envelope, load_snapshot_with_migration, migrate_envelope_payload,
    save_snapshot_with, JsonFileSnapshotStore, MemorySnapshotStore, NoopSnapshotStore,
    SnapshotEnvelope, SnapshotStore, SnapshotStoreFuture, DESKTOP_STATE_NAMESPACE,
    SNAPSHOT_ENVELOPE_VERSION,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
