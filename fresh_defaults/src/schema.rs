//! Runtime view of a record's declared fields.
//!
//! The derive macro emits one [`RecordSchema`] per record inside a `static`.
//! Default expressions are kept as [`Thunk`]s and only run when a
//! construction path asks for them.

use serde_json::Value;

use fresh_defaults_policy::{PolicyConfig, Strategy};

use crate::{Attrs, DefaultsMap, RecordError, RecordResult};

/// Zero-argument function evaluating a default (or empty) expression.
pub type Thunk = fn() -> serde_json::Result<Value>;

/// A declared field.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    name: &'static str,
    default: Option<Thunk>,
    empty: Option<Thunk>,
    required: bool,
}

impl FieldSpec {
    /// Declares a field with no default that is neither required nor able to
    /// produce an empty value.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            default: None,
            empty: None,
            required: false,
        }
    }

    /// Attaches the default expression.
    #[must_use]
    pub const fn with_default(mut self, thunk: Thunk) -> Self {
        self.default = Some(thunk);
        self
    }

    /// Attaches the expression producing the field's empty value.
    #[must_use]
    pub const fn with_empty(mut self, thunk: Thunk) -> Self {
        self.empty = Some(thunk);
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Field name as it appears in attribute sets.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Default expression, if one was declared.
    #[must_use]
    pub const fn default_thunk(&self) -> Option<Thunk> {
        self.default
    }

    /// Whether a default expression was declared.
    #[must_use]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Whether omitting the field fails the construction when no default
    /// applies.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Evaluates the empty value for an omitted, non-required field.
    ///
    /// Fields without an empty expression are empty as JSON `null`.
    pub(crate) fn empty_value(&self, record: &'static str) -> RecordResult<Value> {
        self.empty.map_or(Ok(Value::Null), |thunk| {
            thunk().map_err(|source| RecordError::Default {
                field: self.name.to_owned(),
                record,
                source,
            })
        })
    }
}

/// Declared shape and policy of a record type.
#[derive(Debug)]
pub struct RecordSchema {
    type_id: &'static str,
    fields: &'static [FieldSpec],
    policy: PolicyConfig,
}

impl RecordSchema {
    /// Creates a schema. Used by derive output.
    #[must_use]
    pub const fn new(
        type_id: &'static str,
        fields: &'static [FieldSpec],
        policy: PolicyConfig,
    ) -> Self {
        Self {
            type_id,
            fields,
            policy,
        }
    }

    /// Simple name of the record type.
    #[must_use]
    pub const fn type_id(&self) -> &'static str {
        self.type_id
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Policy configured on the declaration.
    #[must_use]
    pub const fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Strategy resolved from the configured mode.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.policy.strategy()
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Whether the record declares `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Iterates over the declared field names.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldSpec::name)
    }

    /// Builds the map of default expressions.
    #[must_use]
    pub fn defaults_map(&self) -> DefaultsMap {
        DefaultsMap::from_schema(self)
    }

    /// Checks that every key of `attrs` is a declared field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownField`] for the first undeclared key.
    pub fn ensure_known(&self, attrs: &Attrs) -> RecordResult<()> {
        attrs
            .keys()
            .find(|key| !self.contains(key))
            .map_or(Ok(()), |field| {
                Err(RecordError::UnknownField {
                    field: field.to_owned(),
                    record: self.type_id,
                })
            })
    }
}
