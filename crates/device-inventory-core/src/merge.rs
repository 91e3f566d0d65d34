//! Attribute merge engine.
//!
//! Turns an incoming set of partial attribute updates into an
//! [`UpdatePlan`]: the field-level writes that, applied to any existing
//! device record (or to none), realize the merged state.
//!
//! # Merge Rules
//!
//! | Incoming field | Existing attribute | Result |
//! |----------------|--------------------|--------|
//! | value supplied | any | value replaced wholesale |
//! | value omitted | present | value untouched |
//! | description supplied | any | description replaced |
//! | description omitted | present | description untouched |
//! | neither supplied | any | no writes for that name |
//! | (name not incoming) | present | attribute untouched |
//!
//! The plan never depends on the existing record, so a document store can
//! apply it in one conditional update without reading first.

use crate::attribute::{DeviceAttributes, IncomingAttributes};
use crate::device::ATTRIBUTES_FIELD;
use crate::path::FieldPath;
use crate::value::Value;

/// A field of an attribute addressable by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    /// The attribute name
    Name,
    /// The attribute value
    Value,
    /// The attribute description
    Description,
}

impl AttributeField {
    /// Document key of this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeField::Name => "name",
            AttributeField::Value => "value",
            AttributeField::Description => "description",
        }
    }
}

impl std::fmt::Display for AttributeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New content for one attribute field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Set the name (always the attribute's key)
    Name(String),
    /// Replace the value
    Value(Value),
    /// Replace the description
    Description(String),
}

impl FieldUpdate {
    /// The field this update targets.
    #[must_use]
    pub fn field(&self) -> AttributeField {
        match self {
            FieldUpdate::Name(_) => AttributeField::Name,
            FieldUpdate::Value(_) => AttributeField::Value,
            FieldUpdate::Description(_) => AttributeField::Description,
        }
    }

    /// Document representation of the new content.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldUpdate::Name(s) | FieldUpdate::Description(s) => {
                serde_json::Value::String(s.clone())
            }
            FieldUpdate::Value(v) => v.clone().into(),
        }
    }
}

/// A single `(attribute, field, new value)` write.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrite {
    /// Name of the attribute being written
    pub attribute: String,
    /// Field and its new content
    pub update: FieldUpdate,
}

impl FieldWrite {
    /// The field this write targets.
    #[must_use]
    pub fn field(&self) -> AttributeField {
        self.update.field()
    }

    /// Document path of the written field: `attributes.<name>.<field>`.
    #[must_use]
    pub fn path(&self) -> FieldPath {
        FieldPath::new([
            ATTRIBUTES_FIELD,
            self.attribute.as_str(),
            self.field().as_str(),
        ])
    }

    /// Apply this write to an in-memory attribute set.
    pub fn apply(&self, attributes: &mut DeviceAttributes) {
        let attr = attributes.entry(&self.attribute);
        match &self.update {
            FieldUpdate::Name(name) => attr.name.clone_from(name),
            FieldUpdate::Value(value) => attr.value = Some(value.clone()),
            FieldUpdate::Description(description) => {
                attr.description = Some(description.clone());
            }
        }
    }
}

/// Field-level writes realizing an attribute upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
    writes: Vec<FieldWrite>,
    create_if_absent: bool,
}

impl UpdatePlan {
    /// Plan an upsert of `incoming`.
    ///
    /// For every incoming attribute that supplies at least one field, the
    /// plan sets `name` to the key followed by each supplied field.
    /// Attributes supplying nothing contribute no writes. The plan always
    /// asks for the device to be created if absent, even when empty.
    #[must_use]
    pub fn for_upsert(incoming: &IncomingAttributes) -> Self {
        let mut writes = Vec::new();

        for (name, partial) in incoming {
            if partial.is_empty() {
                continue;
            }
            writes.push(FieldWrite {
                attribute: name.clone(),
                update: FieldUpdate::Name(name.clone()),
            });
            if let Some(value) = &partial.value {
                writes.push(FieldWrite {
                    attribute: name.clone(),
                    update: FieldUpdate::Value(value.clone()),
                });
            }
            if let Some(description) = &partial.description {
                writes.push(FieldWrite {
                    attribute: name.clone(),
                    update: FieldUpdate::Description(description.clone()),
                });
            }
        }

        tracing::trace!(
            incoming = incoming.len(),
            writes = writes.len(),
            "Planned attribute upsert"
        );

        Self {
            writes,
            create_if_absent: true,
        }
    }

    /// The planned writes, grouped by attribute in name order.
    #[must_use]
    pub fn writes(&self) -> &[FieldWrite] {
        &self.writes
    }

    /// Whether the device record must be created if it does not exist.
    #[must_use]
    pub fn create_if_absent(&self) -> bool {
        self.create_if_absent
    }

    /// Number of writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Check whether the plan writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Apply every write to an in-memory attribute set.
    pub fn apply(&self, attributes: &mut DeviceAttributes) {
        for write in &self.writes {
            write.apply(attributes);
        }
    }
}

/// Merge `incoming` over `existing`, returning the resulting attributes.
#[must_use]
pub fn merge(existing: &DeviceAttributes, incoming: &IncomingAttributes) -> DeviceAttributes {
    let mut merged = existing.clone();
    UpdatePlan::for_upsert(incoming).apply(&mut merged);
    merged
}
