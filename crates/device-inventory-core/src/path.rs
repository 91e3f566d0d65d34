//! Field paths into a JSON document.
//!
//! Paths are kept as segment lists rather than dotted strings so that
//! attribute names containing `.` stay addressable.

use serde_json::{Map, Value as Json};

/// Path from the document root to a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a path from segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Path segments from the root.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Read the field at this path, if present.
    #[must_use]
    pub fn get<'a>(&self, doc: &'a Map<String, Json>) -> Option<&'a Json> {
        let (last, parents) = self.segments.split_last()?;
        let mut current = doc;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last)
    }

    /// Set the field at this path.
    ///
    /// Missing intermediate objects are created; intermediates that are
    /// not objects are replaced by objects. An empty path is a no-op.
    pub fn set(&self, doc: &mut Map<String, Json>, value: Json) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };
        let mut current = doc;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Json::Object(Map::new()));
            if !slot.is_object() {
                *slot = Json::Object(Map::new());
            }
            let Some(map) = slot.as_object_mut() else {
                return;
            };
            current = map;
        }
        current.insert(last.clone(), value);
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
