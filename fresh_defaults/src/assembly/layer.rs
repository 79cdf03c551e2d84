//! Layer metadata and transport values for record assembly.

use std::borrow::Cow;

use fresh_defaults_policy::DefaultSource;
use serde_json::{Map, Value};

/// Provenance of an assembly layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LayerSource {
    /// Empty values for every non-required field.
    Empty,
    /// Declared defaults, tagged with how they were evaluated.
    Defaults(DefaultSource),
    /// Values supplied by the caller.
    Attributes,
}

/// One layer of field values.
#[derive(Clone, Debug)]
pub struct Layer<'a> {
    source: LayerSource,
    values: Cow<'a, Map<String, Value>>,
}

impl<'a> Layer<'a> {
    /// Construct a layer of empty values.
    #[must_use]
    pub const fn empty(values: Cow<'a, Map<String, Value>>) -> Self {
        Self {
            source: LayerSource::Empty,
            values,
        }
    }

    /// Construct a layer of default values evaluated from `source`.
    #[must_use]
    pub const fn defaults(source: DefaultSource, values: Cow<'a, Map<String, Value>>) -> Self {
        Self {
            source: LayerSource::Defaults(source),
            values,
        }
    }

    /// Construct a layer of caller-supplied attributes.
    #[must_use]
    pub const fn attributes(values: Cow<'a, Map<String, Value>>) -> Self {
        Self {
            source: LayerSource::Attributes,
            values,
        }
    }

    /// Returns the provenance of the layer.
    #[must_use]
    pub const fn source(&self) -> LayerSource {
        self.source
    }

    /// Borrow the layer's values.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}
