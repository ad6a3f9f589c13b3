//! Snapshot persistence contracts, envelope types, and helpers.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Version for [`SnapshotEnvelope`] metadata serialization.
pub const SNAPSHOT_ENVELOPE_VERSION: u32 = 1;
/// Namespace used by the desktop runtime durable snapshot.
pub const DESKTOP_STATE_NAMESPACE: &str = "system.desktop";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for persisted snapshot payloads.
pub struct SnapshotEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owning domain.
    pub namespace: String,
    /// Domain-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl SnapshotEnvelope {
    /// Creates a new envelope and stamps it with a monotonic timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: SNAPSHOT_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Object-safe boxed future used by [`SnapshotStore`] async methods.
pub type SnapshotStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Storage service for loading and saving snapshot envelopes by namespace.
pub trait SnapshotStore {
    /// Loads a persisted envelope by namespace.
    fn load_snapshot_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>>;

    /// Saves a full envelope, replacing any previous one for its namespace.
    fn save_snapshot_envelope<'a>(
        &'a self,
        envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>>;

    /// Deletes the persisted envelope for a namespace.
    fn delete_snapshot<'a>(&'a self, namespace: &'a str)
        -> SnapshotStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for hosts without durable storage and for baseline tests.
pub struct NoopSnapshotStore;

impl SnapshotStore for NoopSnapshotStore {
    fn load_snapshot_envelope<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_snapshot_envelope<'a>(
        &'a self,
        _envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_snapshot<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by namespace. Clones share the same backing map.
pub struct MemorySnapshotStore {
    inner: Rc<RefCell<HashMap<String, SnapshotEnvelope>>>,
}

impl MemorySnapshotStore {
    /// Returns the namespaces currently stored, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut keys = self.inner.borrow().keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_snapshot_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(namespace).cloned()) })
    }

    fn save_snapshot_envelope<'a>(
        &'a self,
        envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(envelope.namespace.clone(), envelope.clone());
            Ok(())
        })
    }

    fn delete_snapshot<'a>(
        &'a self,
        namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(namespace);
            Ok(())
        })
    }
}

#[derive(Debug, Clone)]
/// Store writing one pretty-printed JSON file per namespace under a directory.
pub struct JsonFileSnapshotStore {
    dir: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Creates a store rooted at `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the file backing `namespace`.
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }

    fn read(path: &Path) -> Result<Option<SnapshotEnvelope>, String> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("read {}: {err}", path.display())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| format!("parse {}: {e}", path.display()))
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load_snapshot_envelope<'a>(
        &'a self,
        namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>> {
        Box::pin(async move { Self::read(&self.path_for(namespace)) })
    }

    fn save_snapshot_envelope<'a>(
        &'a self,
        envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            fs::create_dir_all(&self.dir)
                .map_err(|e| format!("create {}: {e}", self.dir.display()))?;
            let path = self.path_for(&envelope.namespace);
            let raw = serde_json::to_string_pretty(envelope).map_err(|e| e.to_string())?;
            fs::write(&path, raw).map_err(|e| format!("write {}: {e}", path.display()))
        })
    }

    fn delete_snapshot<'a>(
        &'a self,
        namespace: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let path = self.path_for(namespace);
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(format!("delete {}: {err}", path.display())),
            }
        })
    }
}

/// Builds a versioned [`SnapshotEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_snapshot_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<SnapshotEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(SnapshotEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when deserialization fails.
pub fn migrate_envelope_payload<T: DeserializeOwned>(
    envelope: &SnapshotEnvelope,
) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

/// Serializes `payload` into an envelope and saves it through `store`.
///
/// # Errors
///
/// Returns serialization or store errors.
pub async fn save_snapshot_with<T: Serialize>(
    store: &dyn SnapshotStore,
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let envelope = build_snapshot_envelope(namespace, schema_version, payload)?;
    store.save_snapshot_envelope(&envelope).await
}

/// Loads a typed payload, routing older schema versions through `migrate`.
///
/// Envelopes at `current_schema_version` are decoded directly. Any other version is handed to
/// `migrate`, which may upgrade the payload or return `Ok(None)` to discard it.
///
/// # Errors
///
/// Returns store errors, envelope-version mismatches, and decode or migration failures.
pub async fn load_snapshot_with_migration<T, F>(
    store: &dyn SnapshotStore,
    namespace: &str,
    current_schema_version: u32,
    migrate: F,
) -> Result<Option<T>, String>
where
    T: DeserializeOwned,
    F: FnOnce(u32, &SnapshotEnvelope) -> Result<Option<T>, String>,
{
    let Some(envelope) = store.load_snapshot_envelope(namespace).await? else {
        return Ok(None);
    };
    if envelope.envelope_version != SNAPSHOT_ENVELOPE_VERSION {
        return Err(format!(
            "unsupported envelope version {} for {namespace}",
            envelope.envelope_version
        ));
    }
    if envelope.schema_version == current_schema_version {
        return migrate_envelope_payload(&envelope).map(Some);
    }
    migrate(envelope.schema_version, &envelope)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestPayload {
        count: u32,
        label: String,
    }

    fn envelope(namespace: &str, schema_version: u32, payload: Value) -> SnapshotEnvelope {
        SnapshotEnvelope {
            envelope_version: SNAPSHOT_ENVELOPE_VERSION,
            namespace: namespace.to_string(),
            schema_version,
            updated_at_unix_ms: 1,
            payload,
        }
    }

    #[test]
    fn snapshot_envelope_serialization_shape_is_snake_case() {
        let value = serde_json::to_value(envelope("system.desktop", 7, json!({"ok": true})))
            .expect("serialize envelope");
        let object = value.as_object().expect("object");
        assert_eq!(object.get("envelope_version"), Some(&json!(1)));
        assert_eq!(object.get("namespace"), Some(&json!("system.desktop")));
        assert_eq!(object.get("schema_version"), Some(&json!(7)));
        assert_eq!(object.get("payload"), Some(&json!({"ok": true})));
        assert!(!object.contains_key("updatedAtUnixMs"));
    }

    #[test]
    fn snapshot_envelope_new_uses_monotonic_timestamp() {
        let first = SnapshotEnvelope::new("a", 1, json!(1));
        let second = SnapshotEnvelope::new("a", 1, json!(2));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[test]
    fn migrate_envelope_payload_errors_on_type_mismatch() {
        let bad = envelope("a", 1, json!({"count": "bad", "label": 7}));
        let err = migrate_envelope_payload::<TestPayload>(&bad).expect_err("decode failure");
        assert!(!err.is_empty());
    }

    #[test]
    fn memory_store_round_trip_overwrite_and_delete() {
        let store = MemorySnapshotStore::default();
        let store_obj: &dyn SnapshotStore = &store;

        block_on(save_snapshot_with(store_obj, "one", 1, &json!({"count": 1, "label": "a"})))
            .expect("save");
        block_on(save_snapshot_with(store_obj, "one", 1, &json!({"count": 2, "label": "b"})))
            .expect("overwrite");
        block_on(save_snapshot_with(store_obj, "two", 1, &json!({}))).expect("save two");
        assert_eq!(store.namespaces(), vec!["one".to_string(), "two".to_string()]);

        let loaded: Option<TestPayload> =
            block_on(load_snapshot_with_migration(store_obj, "one", 1, |_, _| Ok(None)))
                .expect("load");
        assert_eq!(
            loaded,
            Some(TestPayload {
                count: 2,
                label: "b".to_string()
            })
        );

        block_on(store_obj.delete_snapshot("two")).expect("delete");
        assert_eq!(block_on(store_obj.load_snapshot_envelope("two")).expect("load"), None);
    }

    #[test]
    fn load_with_migration_routes_old_schema_versions() {
        let store = MemorySnapshotStore::default();
        block_on(store.save_snapshot_envelope(&envelope("ns", 1, json!({"n": 4}))))
            .expect("save");

        let migrated: Option<TestPayload> =
            block_on(load_snapshot_with_migration(&store, "ns", 2, |version, env| {
                assert_eq!(version, 1);
                Ok(Some(TestPayload {
                    count: env.payload["n"].as_u64().unwrap_or_default() as u32,
                    label: "migrated".to_string(),
                }))
            }))
            .expect("load");
        assert_eq!(migrated.map(|p| p.count), Some(4));

        let discarded: Option<TestPayload> =
            block_on(load_snapshot_with_migration(&store, "ns", 2, |_, _| Ok(None)))
                .expect("load");
        assert_eq!(discarded, None);
    }

    #[test]
    fn load_with_migration_rejects_unknown_envelope_version() {
        let store = MemorySnapshotStore::default();
        let mut env = envelope("ns", 1, json!({}));
        env.envelope_version = 99;
        block_on(store.save_snapshot_envelope(&env)).expect("save");
        let err = block_on(load_snapshot_with_migration::<TestPayload, _>(
            &store,
            "ns",
            1,
            |_, _| Ok(None),
        ))
        .expect_err("version mismatch");
        assert!(err.contains("99"));
    }

    #[test]
    fn json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileSnapshotStore::new(dir.path().join("state"));

        assert_eq!(block_on(store.load_snapshot_envelope("ns")).expect("load"), None);
        block_on(save_snapshot_with(&store, "ns", 3, &json!({"count": 9, "label": "x"})))
            .expect("save");
        assert!(store.path_for("ns").exists());

        let reopened = JsonFileSnapshotStore::new(dir.path().join("state"));
        let loaded = block_on(reopened.load_snapshot_envelope("ns"))
            .expect("load")
            .expect("present");
        assert_eq!(loaded.schema_version, 3);
        assert_eq!(loaded.payload, json!({"count": 9, "label": "x"}));

        block_on(reopened.delete_snapshot("ns")).expect("delete");
        block_on(reopened.delete_snapshot("ns")).expect("delete missing is ok");
        assert!(!store.path_for("ns").exists());
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopSnapshotStore;
        let store_obj: &dyn SnapshotStore = &store;
        block_on(store_obj.save_snapshot_envelope(&envelope("noop", 1, json!({})))).expect("save");
        assert_eq!(block_on(store_obj.load_snapshot_envelope("noop")).expect("load"), None);
        block_on(store_obj.delete_snapshot("noop")).expect("delete");
    }
}
