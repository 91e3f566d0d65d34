//! Document store contract.
//!
//! A document store keeps JSON documents in named collections, each keyed
//! by a string `_id`. Implementations must apply one [`DocumentStore::upsert`]
//! atomically with respect to other calls on the same document, so that
//! concurrent upserts touching disjoint field paths all land.

use crate::error::{StoreError, StoreResult};
use device_inventory_core::device::ID_FIELD;
use device_inventory_core::{FieldPath, FieldWrite};
use serde_json::{Map, Value as Json};

/// A stored JSON document.
pub type Document = Map<String, Json>;

/// Document selection for [`DocumentStore::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Any document in the collection
    All,
    /// The document with this `_id`
    Id(String),
}

impl Filter {
    /// Check whether a document is selected by this filter.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => doc.get(ID_FIELD).and_then(Json::as_str) == Some(id.as_str()),
        }
    }
}

/// Set the field at `path` to `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    /// Target field
    pub path: FieldPath,
    /// New content
    pub value: Json,
}

impl From<&FieldWrite> for FieldSet {
    fn from(write: &FieldWrite) -> Self {
        Self {
            path: write.path(),
            value: write.update.to_json(),
        }
    }
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document matched; one was created
    Created,
    /// An existing document was updated
    Updated,
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertOutcome::Created => write!(f, "created"),
            UpsertOutcome::Updated => write!(f, "updated"),
        }
    }
}

/// Backend holding device documents.
pub trait DocumentStore: Send + Sync {
    /// Find one document matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be queried.
    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Find the document with the given `_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be queried.
    fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.find(collection, &Filter::Id(id.to_string()))
    }

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if a document with the same
    /// `_id` exists, [`StoreError::InvalidInput`] if the document has no
    /// string `_id`, or a backend error.
    fn insert(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Set `sets` on the document `id`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot apply the update.
    fn upsert(&self, collection: &str, id: &str, sets: &[FieldSet]) -> StoreResult<UpsertOutcome>;
}

/// Read the `_id` of a document.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] if `_id` is missing or not a string.
pub fn document_id(doc: &Document) -> StoreResult<&str> {
    doc.get(ID_FIELD)
        .and_then(Json::as_str)
        .ok_or_else(|| StoreError::InvalidInput("document has no string _id".to_string()))
}

/// A document holding only `_id`, the seed of an upsert that matched nothing.
pub(crate) fn seed_document(id: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(ID_FIELD.to_string(), Json::String(id.to_string()));
    doc
}

pub(crate) fn apply_sets(doc: &mut Document, sets: &[FieldSet]) {
    for set in sets {
        set.path.set(doc, set.value.clone());
    }
}
