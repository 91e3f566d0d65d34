//! Device records.

use crate::attribute::{Attribute, DeviceAttributes};
use serde::{Deserialize, Serialize};

/// Document field holding the device identifier.
pub const ID_FIELD: &str = "_id";

/// Document field holding the attribute mapping.
pub const ATTRIBUTES_FIELD: &str = "attributes";

/// Opaque device identifier, the primary key of a device record.
///
/// Any string is well-formed, including the empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a device identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A device record: identifier plus attributes.
///
/// Serializes to the persisted document shape:
///
/// ```json
/// { "_id": "0003", "attributes": { "mac": { "name": "mac", "value": "0003-mac" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier
    #[serde(rename = "_id")]
    pub id: DeviceId,
    /// Attributes keyed by name; absent in a document means empty
    #[serde(default)]
    pub attributes: DeviceAttributes,
}

impl Device {
    /// Create a device without attributes.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>) -> Self {
        Self {
            id: id.into(),
            attributes: DeviceAttributes::new(),
        }
    }

    /// Add an attribute, replacing any attribute of the same name.
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.insert(attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_document_shape() {
        let device = Device::new("0002").with_attribute(Attribute::new("mac").with_value("0002-mac"));
        assert_eq!(
            serde_json::to_value(&device).unwrap(),
            json!({
                "_id": "0002",
                "attributes": {"mac": {"name": "mac", "value": "0002-mac"}}
            })
        );
    }

    #[test]
    fn missing_attributes_decode_as_empty() {
        let device: Device = serde_json::from_value(json!({"_id": "0003"})).unwrap();
        assert_eq!(device.id, DeviceId::from("0003"));
        assert!(device.attributes.is_empty());
    }

    #[test]
    fn optional_device_decodes_null() {
        let device: Option<Device> = serde_json::from_str("null").unwrap();
        assert!(device.is_none());
    }
}
