//! Errors produced while constructing records.

use thiserror::Error;

/// Errors that can occur on a record construction path.
///
/// Every variant is a programmer-facing correctness signal; none of them is
/// transient and none is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// A required field was left unset and no default applies on this path.
    #[error("record `{record}` requires field `{field}`, but no value was supplied")]
    MissingRequiredField {
        /// Name of the unset field.
        field: String,
        /// Record whose construction failed.
        record: &'static str,
    },

    /// An attribute names a field the record does not declare.
    #[error("record `{record}` has no field named `{field}`")]
    UnknownField {
        /// Offending attribute key.
        field: String,
        /// Record the attributes were supplied for.
        record: &'static str,
    },

    /// A default expression produced a value that could not be serialised.
    #[error("default for `{record}.{field}` could not be serialised: {source}")]
    Default {
        /// Field whose default failed.
        field: String,
        /// Record declaring the default.
        record: &'static str,
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },

    /// A supplied attribute value could not be serialised.
    #[error("value for attribute `{field}` could not be serialised: {source}")]
    Serialize {
        /// Attribute key whose value failed.
        field: String,
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },

    /// The generic constructor rejected the merged attribute set.
    #[error("failed to construct `{record}` from attributes: {source}")]
    Construct {
        /// Record being constructed.
        record: &'static str,
        /// Deserialisation failure reported by the record's `Deserialize`.
        #[source]
        source: serde_json::Error,
    },

    /// Attributes were supplied as JSON that is not an object.
    #[error("attributes must be a JSON object, found {found}")]
    NotAnObject {
        /// Kind of JSON value that was supplied instead.
        found: &'static str,
    },
}

/// Result alias used by every construction path.
pub type RecordResult<T> = Result<T, RecordError>;
