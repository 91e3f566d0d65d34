//! Device attributes and partial attribute updates.

use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A named attribute of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, the merge key within a device
    pub name: String,
    /// Attribute value; an attribute may carry a description only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    /// Create an attribute with neither value nor description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            description: None,
        }
    }

    /// Set the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An incoming update for one attribute.
///
/// `None` means "leave the stored field alone", never "clear it".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAttribute {
    /// Replacement value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Replacement description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PartialAttribute {
    /// Update the value only.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            description: None,
        }
    }

    /// Update the description only.
    #[must_use]
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            value: None,
            description: Some(description.into()),
        }
    }

    /// Also update the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check whether this update touches no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.description.is_none()
    }
}

/// Incoming partial updates keyed by attribute name.
pub type IncomingAttributes = BTreeMap<String, PartialAttribute>;

/// The attributes of a device, keyed by name.
///
/// Every key equals the `name` of the attribute stored under it. The map
/// can only be built through [`DeviceAttributes::insert`] and decoding,
/// both of which uphold this.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceAttributes(BTreeMap<String, Attribute>);

impl DeviceAttributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute under its own name, returning any replaced entry.
    pub fn insert(&mut self, attribute: Attribute) -> Option<Attribute> {
        self.0.insert(attribute.name.clone(), attribute)
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.0.get(name)
    }

    /// Check whether an attribute exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Iterate attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.values()
    }

    /// Iterate attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the attribute for `name`, creating a bare one if missing.
    pub(crate) fn entry(&mut self, name: &str) -> &mut Attribute {
        self.0
            .entry(name.to_string())
            .or_insert_with(|| Attribute::new(name))
    }
}

impl FromIterator<Attribute> for DeviceAttributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for attribute in iter {
            attributes.insert(attribute);
        }
        attributes
    }
}

impl IntoIterator for DeviceAttributes {
    type Item = Attribute;
    type IntoIter = std::collections::btree_map::IntoValues<String, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

impl<'de> Deserialize<'de> for DeviceAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, Attribute>::deserialize(deserializer)?;
        if let Some((key, attribute)) = map.iter().find(|(key, a)| **key != a.name) {
            return Err(serde::de::Error::custom(format!(
                "attribute stored under {key:?} is named {:?}",
                attribute.name
            )));
        }
        Ok(Self(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_omits_unset_fields() {
        let attr = Attribute::new("mac");
        assert_eq!(serde_json::to_value(&attr).unwrap(), json!({"name": "mac"}));

        let attr = Attribute::new("mac")
            .with_value("0002-mac")
            .with_description("descr");
        assert_eq!(
            serde_json::to_value(&attr).unwrap(),
            json!({"name": "mac", "value": "0002-mac", "description": "descr"})
        );
    }

    #[test]
    fn partial_attribute_null_means_absent() {
        let partial: PartialAttribute =
            serde_json::from_value(json!({"value": null, "description": "d"})).unwrap();
        assert_eq!(partial, PartialAttribute::description("d"));
        assert!(serde_json::from_value::<PartialAttribute>(json!({}))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn device_attributes_keyed_by_name() {
        let attrs: DeviceAttributes = [
            Attribute::new("sn").with_value("0003-sn"),
            Attribute::new("mac").with_value("0003-mac"),
        ]
        .into_iter()
        .collect();

        assert_eq!(attrs.names().collect::<Vec<_>>(), vec!["mac", "sn"]);
        assert_eq!(attrs.get("sn").unwrap().name, "sn");
    }

    #[test]
    fn decode_rejects_key_name_mismatch() {
        let ok = json!({"mac": {"name": "mac", "value": "x"}});
        assert!(serde_json::from_value::<DeviceAttributes>(ok).is_ok());

        let bad = json!({"mac": {"name": "sn", "value": "x"}});
        let err = serde_json::from_value::<DeviceAttributes>(bad).unwrap_err();
        assert!(err.to_string().contains("named \"sn\""));
    }
}
