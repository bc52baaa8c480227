//! Session-scoped persistence for the widget order.
//!
//! The stored form is a JSON array of `{"id", "rowSpan", "colSpan"}` objects,
//! the same shape the gateway's web UI keeps in browser session storage. On
//! load the stored order is reconciled against the registry defaults: the
//! registry is the authority for spans and for which widgets exist, the
//! stored state is the authority for ordering only.
//!
//! Persistence is best-effort. A missing or malformed value degrades to
//! "no stored layout" and a failed write is logged and swallowed; the worst
//! outcome is that the arrangement does not survive a restart.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{Layout, LayoutEntry};

/// Storage key for the dashboard widget order.
pub const LAYOUT_KEY: &str = "dashboard-layout";

/// Errors surfaced by [`SessionStore`] writes.
///
/// Reads never error: an unreadable value is reported as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to write the value to the backing file.
    #[error("Failed to write session state: {path}")]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Key-value substrate for session state.
///
/// The console uses [`FileStore`] under the XDG state directory; tests use
/// [`MemoryStore`].
pub trait SessionStore {
    /// Returns the stored value for `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store keeping one `<key>.json` file per key in a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("failed to read session state {:?}: {}", path, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, value).map_err(|source| StoreError::Write { path, source })
    }
}

/// Stored form of one layout entry. Field names match the web UI's session
/// storage shape so both frontends can share a persisted layout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    id: String,
    row_span: u16,
    col_span: u16,
}

/// Loads, reconciles, and saves the widget order through a [`SessionStore`].
#[derive(Debug)]
pub struct LayoutStore<S> {
    store: S,
}

impl<S: SessionStore> LayoutStore<S> {
    /// Wraps the given substrate.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the persisted order and reconciles it against `defaults`, the
    /// registry's default layout for the current column count.
    ///
    /// Returns `None` when nothing usable is stored; callers then fall back
    /// to `defaults` directly. Reconciliation rules:
    /// - spans always come from `defaults` (stored spans may be stale),
    /// - stored order wins for ids known to the registry,
    /// - registry ids missing from the stored order are appended in registry
    ///   order,
    /// - stored ids unknown to the registry are dropped,
    /// - duplicate stored ids keep their first occurrence.
    pub fn load(&self, defaults: &Layout) -> Option<Layout> {
        let raw = self.store.get(LAYOUT_KEY)?;
        let stored: Vec<StoredEntry> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("ignoring malformed stored layout: {}", e);
                return None;
            }
        };

        let mut entries: Vec<LayoutEntry> = Vec::with_capacity(defaults.len());
        let mut seen = std::collections::HashSet::new();
        for stored_entry in &stored {
            let Some(pos) = defaults.position(&stored_entry.id) else {
                tracing::debug!("dropping stored widget {:?}: not in registry", stored_entry.id);
                continue;
            };
            if !seen.insert(stored_entry.id.as_str()) {
                tracing::debug!("dropping duplicate stored widget {:?}", stored_entry.id);
                continue;
            }
            // Registry wins on spans.
            entries.push(defaults.entries()[pos].clone());
        }
        for default_entry in defaults.entries() {
            if !seen.contains(default_entry.id.as_str()) {
                entries.push(default_entry.clone());
            }
        }
        Some(Layout::new(entries))
    }

    /// Serializes and writes `layout`. Write failures are logged and
    /// swallowed; persistence is advisory.
    pub fn save(&mut self, layout: &Layout) {
        let stored: Vec<StoredEntry> = layout
            .entries()
            .iter()
            .map(|e| StoredEntry {
                id: e.id.clone(),
                row_span: e.row_span,
                col_span: e.col_span,
            })
            .collect();
        let json = match serde_json::to_string(&stored) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize layout: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(LAYOUT_KEY, &json) {
            tracing::warn!("failed to persist layout: {}", e);
        }
    }

    /// The underlying substrate, for tests.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Layout {
        Layout::new(vec![
            LayoutEntry::new("pending", 1, 1),
            LayoutEntry::new("processed", 1, 1),
            LayoutEntry::new("uploader", 2, 1),
        ])
    }

    fn store_with(raw: &str) -> LayoutStore<MemoryStore> {
        let mut mem = MemoryStore::new();
        mem.set(LAYOUT_KEY, raw).expect("memory set cannot fail");
        LayoutStore::new(mem)
    }

    #[test]
    fn load_with_nothing_stored_returns_none() {
        let store = LayoutStore::new(MemoryStore::new());
        assert!(store.load(&defaults()).is_none());
    }

    #[test]
    fn load_malformed_json_returns_none() {
        let store = store_with("{not json");
        assert!(store.load(&defaults()).is_none());
    }

    #[test]
    fn load_non_array_shape_returns_none() {
        let store = store_with(r#"{"id": "pending"}"#);
        assert!(store.load(&defaults()).is_none());
    }

    #[test]
    fn load_preserves_stored_order() {
        let store = store_with(
            r#"[{"id":"uploader","rowSpan":2,"colSpan":1},
                {"id":"pending","rowSpan":1,"colSpan":1},
                {"id":"processed","rowSpan":1,"colSpan":1}]"#,
        );
        let layout = store.load(&defaults()).expect("stored layout parses");
        assert_eq!(layout.ids(), vec!["uploader", "pending", "processed"]);
    }

    #[test]
    fn registry_wins_on_spans() {
        // Stored spans are stale (uploader persisted as 1x1); the registry's
        // 2x1 must win.
        let store = store_with(
            r#"[{"id":"uploader","rowSpan":1,"colSpan":1},
                {"id":"pending","rowSpan":3,"colSpan":4}]"#,
        );
        let layout = store.load(&defaults()).expect("stored layout parses");
        assert_eq!(layout.entries()[0], LayoutEntry::new("uploader", 2, 1));
        assert_eq!(layout.entries()[1], LayoutEntry::new("pending", 1, 1));
    }

    #[test]
    fn unknown_stored_ids_are_dropped() {
        let store = store_with(
            r#"[{"id":"retired","rowSpan":1,"colSpan":1},
                {"id":"pending","rowSpan":1,"colSpan":1}]"#,
        );
        let layout = store.load(&defaults()).expect("stored layout parses");
        assert!(!layout.ids().contains(&"retired"));
    }

    #[test]
    fn missing_registry_ids_are_appended_in_registry_order() {
        let store = store_with(r#"[{"id":"processed","rowSpan":1,"colSpan":1}]"#);
        let layout = store.load(&defaults()).expect("stored layout parses");
        assert_eq!(layout.ids(), vec!["processed", "pending", "uploader"]);
    }

    #[test]
    fn duplicate_stored_ids_keep_first_occurrence() {
        let store = store_with(
            r#"[{"id":"processed","rowSpan":1,"colSpan":1},
                {"id":"pending","rowSpan":1,"colSpan":1},
                {"id":"processed","rowSpan":1,"colSpan":1}]"#,
        );
        let layout = store.load(&defaults()).expect("stored layout parses");
        assert_eq!(layout.ids(), vec!["processed", "pending", "uploader"]);
    }

    #[test]
    fn empty_stored_array_reconciles_to_defaults() {
        let store = store_with("[]");
        let layout = store.load(&defaults()).expect("empty array parses");
        assert_eq!(layout, defaults());
    }

    #[test]
    fn save_then_load_round_trips_order() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let d = defaults();
        let reordered = d.moved("uploader", "pending").expect("both ids exist");
        store.save(&reordered);
        let loaded = store.load(&d).expect("saved layout loads");
        assert_eq!(loaded.ids(), reordered.ids());

        // Idempotence: saving the loaded result changes nothing.
        store.save(&loaded);
        let again = store.load(&d).expect("saved layout loads");
        assert_eq!(again.ids(), loaded.ids());
    }

    #[test]
    fn stored_json_uses_camel_case_keys() {
        let mut store = LayoutStore::new(MemoryStore::new());
        store.save(&defaults());
        let raw = store.store().get(LAYOUT_KEY).expect("value was stored");
        assert!(raw.contains("rowSpan"), "raw: {raw}");
        assert!(raw.contains("colSpan"), "raw: {raw}");
        assert!(!raw.contains("row_span"), "raw: {raw}");
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut fs_store = FileStore::new(dir.path().join("state"));
        assert!(fs_store.get(LAYOUT_KEY).is_none());
        fs_store
            .set(LAYOUT_KEY, "[]")
            .expect("write to temp dir succeeds");
        assert_eq!(fs_store.get(LAYOUT_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_write_failure_is_reported() {
        // A directory where the value file should be makes the write fail.
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::create_dir_all(dir.path().join(format!("{LAYOUT_KEY}.json")))
            .expect("failed to create blocking dir");
        let mut fs_store = FileStore::new(dir.path());
        let err = fs_store.set(LAYOUT_KEY, "[]").expect_err("write should fail");
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn save_swallows_write_failures() {
        struct FailingStore;
        impl SessionStore for FailingStore {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }
            fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
                Err(StoreError::Write {
                    path: PathBuf::from("/nowhere"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "quota"),
                })
            }
        }
        let mut store = LayoutStore::new(FailingStore);
        // Must not panic or propagate.
        store.save(&defaults());
    }
}
