//! In-memory document store.

use crate::document::{
    apply_sets, document_id, seed_document, Document, DocumentStore, FieldSet, Filter,
    UpsertOutcome,
};
use crate::error::{StoreError, StoreResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store kept entirely in process memory.
///
/// Every instance is isolated; dropping it discards all documents. Upserts
/// run under the write lock, so each one is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns error if the store lock is poisoned.
    pub fn count(&self, collection: &str) -> StoreResult<usize> {
        Ok(self.read()?.get(collection).map_or(0, BTreeMap::len))
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.read()?;
        let Some(docs) = collections.get(collection) else {
            return Ok(None);
        };

        let found = match filter {
            Filter::Id(id) => docs.get(id).cloned(),
            Filter::All => docs.values().next().cloned(),
        };
        Ok(found)
    }

    fn insert(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)?.to_string();
        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.contains_key(&id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id, document);
        Ok(())
    }

    fn upsert(&self, collection: &str, id: &str, sets: &[FieldSet]) -> StoreResult<UpsertOutcome> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();

        let outcome = if docs.contains_key(id) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        let doc = docs
            .entry(id.to_string())
            .or_insert_with(|| seed_document(id));
        apply_sets(doc, sets);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device_inventory_core::FieldPath;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn insert_and_find() {
        let store = MemoryStore::new();
        store.insert("devices", doc(json!({"_id": "0002"}))).unwrap();

        assert!(store.find_by_id("devices", "0002").unwrap().is_some());
        assert!(store.find_by_id("devices", "0003").unwrap().is_none());
        assert!(store.find_by_id("other", "0002").unwrap().is_none());
        assert!(store.find("devices", &Filter::All).unwrap().is_some());
    }

    #[test]
    fn insert_duplicate_fails() {
        let store = MemoryStore::new();
        store.insert("devices", doc(json!({"_id": "0002"}))).unwrap();
        let err = store
            .insert("devices", doc(json!({"_id": "0002", "x": 1})))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref id, .. } if id == "0002"));
        assert_eq!(store.count("devices").unwrap(), 1);
    }

    #[test]
    fn upsert_creates_then_updates() {
        let store = MemoryStore::new();
        let set = FieldSet {
            path: FieldPath::new(["attributes", "mac", "value"]),
            value: json!("m"),
        };

        assert_eq!(
            store.upsert("devices", "0099", &[set.clone()]).unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store.upsert("devices", "0099", &[set]).unwrap(),
            UpsertOutcome::Updated
        );
        assert_eq!(
            serde_json::Value::Object(store.find_by_id("devices", "0099").unwrap().unwrap()),
            json!({"_id": "0099", "attributes": {"mac": {"value": "m"}}})
        );
    }

    #[test]
    fn empty_upsert_creates_bare_document() {
        let store = MemoryStore::new();
        store.upsert("devices", "0099", &[]).unwrap();
        assert_eq!(
            serde_json::Value::Object(store.find_by_id("devices", "0099").unwrap().unwrap()),
            json!({"_id": "0099"})
        );
    }
}
