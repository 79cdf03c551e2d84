//! Layered assembly of a record from empty values, defaults and attributes.
//!
//! Every construction path builds an [`Assembly`]: a stack of [`Layer`]s
//! merged key by key, later layers winning. Merging is shallow. A field's
//! value is replaced wholesale by a later layer, never deep-merged, so an
//! attribute always yields exactly the supplied value.

mod layer;

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{RecordError, RecordResult, RecordSchema};

pub use layer::{Layer, LayerSource};

/// Accumulates layers for one construction of a record.
///
/// ```rust
/// use std::borrow::Cow;
/// use fresh_defaults::{Assembly, Layer, LayerSource, Record};
/// use fresh_defaults::serde_json::json;
///
/// #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize, Record)]
/// #[record(mode = "ignore_defaults")]
/// struct Sounding {
///     #[record(default = Some(3))]
///     depth: Option<u8>,
/// }
///
/// let mut assembly = Assembly::for_record(Sounding::schema())?;
/// let supplied = json!({"depth": 9}).as_object().cloned().unwrap_or_default();
/// assembly.push(Layer::attributes(Cow::Owned(supplied)));
/// assert_eq!(assembly.provenance("depth"), Some(LayerSource::Attributes));
/// let sounding: Sounding = assembly.finish()?;
/// assert_eq!(sounding, Sounding { depth: Some(9) });
/// # Ok::<_, fresh_defaults::RecordError>(())
/// ```
#[derive(Debug)]
pub struct Assembly<'a> {
    schema: &'static RecordSchema,
    layers: Vec<Layer<'a>>,
}

impl<'a> Assembly<'a> {
    /// Starts an assembly with no layers.
    #[must_use]
    pub const fn new(schema: &'static RecordSchema) -> Self {
        Self {
            schema,
            layers: Vec::new(),
        }
    }

    /// Starts an assembly whose bottom layer holds the empty value of every
    /// non-required field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Default`] when an empty value cannot be
    /// serialised.
    pub fn for_record(schema: &'static RecordSchema) -> RecordResult<Self> {
        let mut empty = Map::new();
        for field in schema.fields().iter().filter(|field| !field.is_required()) {
            empty.insert(field.name().to_owned(), field.empty_value(schema.type_id())?);
        }
        let mut assembly = Self::new(schema);
        assembly.push(Layer::empty(Cow::Owned(empty)));
        Ok(assembly)
    }

    /// Pushes a layer on top of the stack.
    pub fn push(&mut self, layer: Layer<'a>) {
        self.layers.push(layer);
    }

    /// Pushes `layer` when present.
    pub fn push_optional(&mut self, layer: Option<Layer<'a>>) {
        if let Some(present) = layer {
            self.push(present);
        }
    }

    /// Layers in push order.
    #[must_use]
    pub fn layers(&self) -> &[Layer<'a>] {
        &self.layers
    }

    /// Source of the layer that supplies `field`'s final value.
    #[must_use]
    pub fn provenance(&self, field: &str) -> Option<LayerSource> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.values().contains_key(field))
            .map(Layer::source)
    }

    /// Merges the layers, later layers winning per field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownField`] when a layer carries a key the
    /// record does not declare.
    pub fn merged(&self) -> RecordResult<Map<String, Value>> {
        let mut merged = Map::new();
        for layer in &self.layers {
            for (key, value) in layer.values() {
                if !self.schema.contains(key) {
                    return Err(RecordError::UnknownField {
                        field: key.clone(),
                        record: self.schema.type_id(),
                    });
                }
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged)
    }

    /// Merges the layers and hands the result to the record's generic
    /// constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownField`] for undeclared keys,
    /// [`RecordError::MissingRequiredField`] when a required field has no
    /// value, and [`RecordError::Construct`] when deserialisation fails.
    pub fn finish<R: DeserializeOwned>(self) -> RecordResult<R> {
        let record = self.schema.type_id();
        let merged = self.merged()?;
        if let Some(missing) = self
            .schema
            .fields()
            .iter()
            .find(|field| field.is_required() && !merged.contains_key(field.name()))
        {
            return Err(RecordError::MissingRequiredField {
                field: missing.name().to_owned(),
                record,
            });
        }
        tracing::trace!(record, fields = merged.len(), "assembling record");
        serde_json::from_value(Value::Object(merged))
            .map_err(|source| RecordError::Construct { record, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSpec;
    use fresh_defaults_policy::{DefaultSource, PolicyConfig};
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    fn no_port() -> serde_json::Result<Value> {
        Ok(Value::Null)
    }

    static FIELDS: [FieldSpec; 2] = [
        FieldSpec::new("host").required(),
        FieldSpec::new("port").with_empty(no_port),
    ];

    static SCHEMA: RecordSchema = RecordSchema::new("Endpoint", &FIELDS, PolicyConfig::new());

    #[derive(Debug, Deserialize, PartialEq)]
    struct Endpoint {
        host: String,
        port: Option<u16>,
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[rstest]
    fn later_layers_replace_whole_values() {
        let mut assembly = Assembly::for_record(&SCHEMA).expect("empty layer");
        assembly.push(Layer::defaults(
            DefaultSource::Fresh,
            Cow::Owned(object(json!({"host": "default", "port": 80}))),
        ));
        assembly.push(Layer::attributes(Cow::Owned(object(json!({"host": "edge"})))));

        assert_eq!(
            assembly.provenance("port"),
            Some(LayerSource::Defaults(DefaultSource::Fresh))
        );
        assert_eq!(assembly.provenance("host"), Some(LayerSource::Attributes));
        let endpoint: Endpoint = assembly.finish().expect("assemble");
        assert_eq!(
            endpoint,
            Endpoint {
                host: "edge".to_owned(),
                port: Some(80)
            }
        );
    }

    #[rstest]
    fn missing_required_field_is_reported() {
        let assembly = Assembly::for_record(&SCHEMA).expect("empty layer");
        let err = assembly.finish::<Endpoint>().expect_err("host is required");
        assert!(matches!(
            err,
            RecordError::MissingRequiredField { ref field, record: "Endpoint" } if field == "host"
        ));
    }

    #[rstest]
    fn unknown_keys_in_any_layer_are_rejected() {
        let mut assembly = Assembly::new(&SCHEMA);
        assembly.push(Layer::attributes(Cow::Owned(object(json!({"hots": "x"})))));
        let err = assembly.merged().expect_err("hots is undeclared");
        assert!(matches!(err, RecordError::UnknownField { ref field, .. } if field == "hots"));
    }

    #[rstest]
    fn deserialisation_failures_surface_as_construct_errors() {
        let mut assembly = Assembly::for_record(&SCHEMA).expect("empty layer");
        assembly.push(Layer::attributes(Cow::Owned(object(
            json!({"host": "edge", "port": "eighty"}),
        ))));
        let err = assembly.finish::<Endpoint>().expect_err("port must be numeric");
        assert!(matches!(err, RecordError::Construct { record: "Endpoint", .. }));
    }
}
