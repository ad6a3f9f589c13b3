//! Desktop snapshot persistence through a [`SnapshotStore`].

use platform_host::{
    load_snapshot_with_migration, migrate_envelope_payload, save_snapshot_with, SnapshotEnvelope,
    SnapshotStore, DESKTOP_STATE_NAMESPACE,
};
use thiserror::Error;
use tracing::warn;

use crate::model::{DesktopSnapshot, DESKTOP_LAYOUT_SCHEMA_VERSION};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Snapshot load/save failures.
pub enum PersistenceError {
    /// The snapshot store or payload codec reported an error.
    #[error("desktop snapshot {operation} failed: {message}")]
    Store {
        /// `load` or `save`.
        operation: &'static str,
        /// Store-provided message.
        message: String,
    },
}

fn migrate_desktop_snapshot(
    schema_version: u32,
    envelope: &SnapshotEnvelope,
) -> Result<Option<DesktopSnapshot>, String> {
    match schema_version {
        0 => migrate_envelope_payload(envelope).map(Some),
        _ => {
            warn!(schema_version, "discarding desktop snapshot with unknown schema");
            Ok(None)
        }
    }
}

/// Loads the desktop snapshot, migrating older schemas.
///
/// # Errors
///
/// Returns [`PersistenceError::Store`] when the store fails or the payload cannot be decoded.
pub async fn load_desktop_snapshot(
    store: &dyn SnapshotStore,
) -> Result<Option<DesktopSnapshot>, PersistenceError> {
    load_snapshot_with_migration(
        store,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        migrate_desktop_snapshot,
    )
    .await
    .map_err(|message| PersistenceError::Store {
        operation: "load",
        message,
    })
}

/// Loads the boot snapshot, logging and discarding any failure.
pub async fn load_boot_snapshot(store: &dyn SnapshotStore) -> Option<DesktopSnapshot> {
    match load_desktop_snapshot(store).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!("boot snapshot load failed: {err}");
            None
        }
    }
}

/// Saves `snapshot` under the desktop namespace.
///
/// # Errors
///
/// Returns [`PersistenceError::Store`] when serialization or the store fails.
pub async fn persist_desktop_snapshot(
    store: &dyn SnapshotStore,
    snapshot: &DesktopSnapshot,
) -> Result<(), PersistenceError> {
    save_snapshot_with(
        store,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_LAYOUT_SCHEMA_VERSION,
        snapshot,
    )
    .await
    .map_err(|message| PersistenceError::Store {
        operation: "save",
        message,
    })
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{build_snapshot_envelope, FsNode, MemorySnapshotStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::DesktopState;

    fn snapshot() -> DesktopSnapshot {
        DesktopState::default().snapshot(FsNode::directory(1), "/".to_string())
    }

    #[test]
    fn desktop_namespace_migration_supports_schema_zero() {
        let envelope =
            build_snapshot_envelope(DESKTOP_STATE_NAMESPACE, 0, &snapshot()).expect("envelope");
        let migrated =
            migrate_desktop_snapshot(0, &envelope).expect("schema-zero migration should succeed");
        assert!(migrated.is_some(), "expected migrated desktop snapshot");
    }

    #[test]
    fn unknown_schema_versions_are_discarded() {
        let store = MemorySnapshotStore::default();
        let envelope =
            build_snapshot_envelope(DESKTOP_STATE_NAMESPACE, 42, &snapshot()).expect("envelope");
        block_on(store.save_snapshot_envelope(&envelope)).expect("save");
        assert_eq!(block_on(load_boot_snapshot(&store)), None);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let store = MemorySnapshotStore::default();
        let snapshot = snapshot();
        block_on(persist_desktop_snapshot(&store, &snapshot)).expect("persist");
        assert_eq!(store.namespaces(), vec![DESKTOP_STATE_NAMESPACE.to_string()]);
        assert_eq!(
            block_on(load_desktop_snapshot(&store)).expect("load"),
            Some(snapshot)
        );
    }

    #[test]
    fn corrupt_payload_is_a_load_error_but_boot_ignores_it() {
        let store = MemorySnapshotStore::default();
        let envelope = build_snapshot_envelope(
            DESKTOP_STATE_NAMESPACE,
            DESKTOP_LAYOUT_SCHEMA_VERSION,
            &serde_json::json!({ "windows": "nope" }),
        )
        .expect("envelope");
        block_on(store.save_snapshot_envelope(&envelope)).expect("save");
        assert!(matches!(
            block_on(load_desktop_snapshot(&store)),
            Err(PersistenceError::Store {
                operation: "load",
                ..
            })
        ));
        assert_eq!(block_on(load_boot_snapshot(&store)), None);
    }
}
