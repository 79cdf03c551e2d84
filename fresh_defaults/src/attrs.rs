//! Attribute sets: named field values supplied by a caller.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{RecordError, RecordResult};

/// A set of named attribute values.
///
/// Values are stored serialised so one set can feed any record's generic
/// constructor. Keys are checked against a record's schema only when the set
/// reaches a construction path.
///
/// ```rust
/// use fresh_defaults::Attrs;
///
/// let attrs = Attrs::new().with("retries", &3)?.with("label", &"primary")?;
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs.get("retries"), Some(&fresh_defaults::serde_json::json!(3)));
/// # Ok::<_, fresh_defaults::RecordError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attrs {
    values: Map<String, Value>,
}

impl Attrs {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field`, serialising `value`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Serialize`] when `value` cannot be serialised.
    pub fn with<T>(mut self, field: impl Into<String>, value: &T) -> RecordResult<Self>
    where
        T: Serialize + ?Sized,
    {
        self.set(field, value)?;
        Ok(self)
    }

    /// Sets `field`, serialising `value` and replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Serialize`] when `value` cannot be serialised.
    pub fn set<T>(&mut self, field: impl Into<String>, value: &T) -> RecordResult<()>
    where
        T: Serialize + ?Sized,
    {
        let key = field.into();
        let serialised = serde_json::to_value(value)
            .map_err(|source| RecordError::Serialize {
                field: key.clone(),
                source,
            })?;
        self.values.insert(key, serialised);
        Ok(())
    }

    /// Builds a set from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] for any other JSON value.
    pub fn from_json(value: Value) -> RecordResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Err(RecordError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(RecordError::NotAnObject { found: "a boolean" }),
            Value::Number(_) => Err(RecordError::NotAnObject { found: "a number" }),
            Value::String(_) => Err(RecordError::NotAnObject { found: "a string" }),
            Value::Array(_) => Err(RecordError::NotAnObject { found: "an array" }),
        }
    }

    /// Value supplied for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Whether `field` was supplied.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of supplied attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attribute was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Supplied attribute names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overlays `other` on top of `self`; keys present in both take `other`'s
    /// value.
    pub fn overlay(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Collects the serialised fields of a `literal!` invocation.
    pub(crate) fn from_fields(
        fields: Vec<(&'static str, serde_json::Result<Value>)>,
    ) -> RecordResult<Self> {
        let mut values = Map::new();
        for (written, value) in fields {
            let field = written.strip_prefix("r#").unwrap_or(written);
            let serialised = value.map_err(|source| RecordError::Serialize {
                field: field.to_owned(),
                source,
            })?;
            values.insert(field.to_owned(), serialised);
        }
        Ok(Self { values })
    }
}

impl From<Map<String, Value>> for Attrs {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn overlay_prefers_the_incoming_value() {
        let mut base = Attrs::from_json(json!({"x": 1, "y": 2})).expect("object");
        let incoming = Attrs::from_json(json!({"x": 7})).expect("object");
        base.overlay(incoming);
        assert_eq!(base.into_map(), json!({"x": 7, "y": 2}).as_object().cloned().expect("object"));
    }

    #[rstest]
    #[case(json!(null), "null")]
    #[case(json!([1]), "an array")]
    #[case(json!("x"), "a string")]
    fn from_json_rejects_non_objects(#[case] input: Value, #[case] found: &str) {
        let err = Attrs::from_json(input).expect_err("not an object");
        assert!(matches!(err, RecordError::NotAnObject { found: f } if f == found));
    }

    #[rstest]
    fn set_replaces_previous_values() {
        let mut attrs = Attrs::new();
        attrs.set("x", &1).expect("serialise");
        attrs.set("x", &2).expect("serialise");
        assert_eq!(attrs.get("x"), Some(&json!(2)));
        assert_eq!(attrs.len(), 1);
    }

    #[rstest]
    fn unserialisable_values_name_the_field() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1, 2), "tuple keys are not JSON keys");
        let err = Attrs::new().with("lookup", &map).expect_err("map keys must be strings");
        assert!(matches!(err, RecordError::Serialize { ref field, .. } if field == "lookup"));
    }

    #[rstest]
    fn literal_fields_drop_raw_identifier_prefixes() {
        let attrs = Attrs::from_fields(vec![("r#type", Ok(json!("y"))), ("id", Ok(json!(1)))])
            .expect("serialised fields");
        assert_eq!(attrs.get("type"), Some(&json!("y")));
        assert_eq!(attrs.get("r#type"), None);
    }
}
