//! Device store API.

use crate::document::{Document, DocumentStore, FieldSet, UpsertOutcome};
use crate::error::{StoreError, StoreResult};
use crate::target::ConnectionTarget;
use device_inventory_core::{Device, DeviceId, IncomingAttributes, UpdatePlan};
use std::sync::Arc;

/// Collection holding device documents.
pub const DEVICES_COLLECTION: &str = "devices";

/// Device records over a document store.
///
/// Holds only a shared handle to the backend; clones are cheap and may be
/// used from many threads at once. Every call is a single round trip and
/// no call is retried.
#[derive(Clone)]
pub struct DataStore {
    docs: Arc<dyn DocumentStore>,
}

impl DataStore {
    /// Open the backend named by `target`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the target cannot be parsed or
    /// the backend cannot be opened.
    pub fn open(target: &str) -> StoreResult<Self> {
        let parsed = ConnectionTarget::parse(target)?;
        let docs = parsed.open()?;
        tracing::info!(backend = %parsed, "Device store ready");
        Ok(Self::with_backend(docs))
    }

    /// Use an already open backend.
    #[must_use]
    pub fn with_backend(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    /// The underlying document store.
    #[must_use]
    pub fn backend(&self) -> &dyn DocumentStore {
        self.docs.as_ref()
    }

    /// Look up a device by identifier.
    ///
    /// A missing device is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the stored document is malformed.
    pub fn get_device(&self, id: &DeviceId) -> StoreResult<Option<Device>> {
        let found = self.docs.find_by_id(DEVICES_COLLECTION, id.as_str())?;
        tracing::debug!(device_id = %id, found = found.is_some(), "Get device");

        found.map(decode_device).transpose()
    }

    /// Insert a whole new device record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if `device` is `None`,
    /// [`StoreError::DuplicateKey`] if a record with the same identifier
    /// exists, or a backend error.
    pub fn add_device(&self, device: Option<&Device>) -> StoreResult<()> {
        let device = device.ok_or_else(|| StoreError::InvalidInput("no device given".to_string()))?;

        let document = match serde_json::to_value(device)? {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidInput(format!(
                    "device did not encode as a document: {other}"
                )))
            }
        };

        self.docs.insert(DEVICES_COLLECTION, document)?;
        tracing::debug!(
            device_id = %device.id,
            attributes = device.attributes.len(),
            "Added device"
        );
        Ok(())
    }

    /// Merge `incoming` into the device's attributes, creating the device
    /// if it does not exist.
    ///
    /// Attributes not named in `incoming` and fields an incoming attribute
    /// omits are left as stored. An empty `incoming` still creates the
    /// device.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot apply the update.
    pub fn upsert_attributes(
        &self,
        id: &DeviceId,
        incoming: &IncomingAttributes,
    ) -> StoreResult<UpsertOutcome> {
        let plan = UpdatePlan::for_upsert(incoming);
        let sets: Vec<FieldSet> = plan.writes().iter().map(FieldSet::from).collect();

        let outcome = self.docs.upsert(DEVICES_COLLECTION, id.as_str(), &sets)?;
        tracing::debug!(
            device_id = %id,
            writes = sets.len(),
            %outcome,
            "Upserted attributes"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore").finish_non_exhaustive()
    }
}

fn decode_device(doc: Document) -> StoreResult<Device> {
    Ok(serde_json::from_value(serde_json::Value::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use device_inventory_core::{Attribute, PartialAttribute};

    fn store() -> DataStore {
        DataStore::with_backend(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn add_then_get() {
        let store = store();
        let device = Device::new("0002").with_attribute(Attribute::new("mac").with_value("0002-mac"));
        store.add_device(Some(&device)).unwrap();

        assert_eq!(store.get_device(&"0002".into()).unwrap(), Some(device));
    }

    #[test]
    fn upsert_reports_outcome() {
        let store = store();
        let incoming: IncomingAttributes =
            [("mac".to_string(), PartialAttribute::value("m"))].into_iter().collect();

        assert_eq!(
            store.upsert_attributes(&"0099".into(), &incoming).unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store.upsert_attributes(&"0099".into(), &incoming).unwrap(),
            UpsertOutcome::Updated
        );
    }

    #[test]
    fn decode_device_rejects_bad_shape() {
        let mut doc = Document::new();
        doc.insert("_id".into(), serde_json::json!("x"));
        doc.insert("attributes".into(), serde_json::json!([1, 2]));
        assert!(matches!(decode_device(doc), Err(StoreError::Serialization(_))));
    }
}
