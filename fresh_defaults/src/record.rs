//! The [`Record`] trait and the construction entry points built on it.

use std::borrow::Cow;

use fresh_defaults_policy::DefaultSource;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Assembly, Attrs, CallSite, Layer, RecordResult, RecordSchema};

/// A record type with declared default expressions.
///
/// Implemented by `#[derive(Record)]`. The derive supplies [`schema`] and
/// [`declaration_defaults`]; the construction methods have default bodies
/// driven by the schema's resolved strategy.
///
/// [`construct`] is the canonical construct-from-attributes operation and
/// the documented override point: the derive overrides it for
/// `mode = "override"` so it re-evaluates every default on each call, and a
/// hand-written implementation may override it too. Overrides should still
/// end in [`base_construct`], which is the pre-override behaviour.
///
/// [`schema`]: Record::schema
/// [`declaration_defaults`]: Record::declaration_defaults
/// [`construct`]: Record::construct
/// [`base_construct`]: Record::base_construct
pub trait Record: Serialize + DeserializeOwned + Sized {
    /// Declared fields and policy.
    fn schema() -> &'static RecordSchema;

    /// Cache holding the defaults frozen for the record type as a whole.
    fn declaration_defaults() -> &'static CallSite;

    /// The base generic constructor, before any override.
    ///
    /// Omitted fields take the values of the strategy's base source, then
    /// their empty values.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::RecordError`] for undeclared keys, missing
    /// required fields, or values the record cannot deserialise.
    fn base_construct(attrs: Attrs) -> RecordResult<Self> {
        let schema = Self::schema();
        let mut assembly = Assembly::for_record(schema)?;
        assembly.push_optional(defaults_layer::<Self>(schema.strategy().base, None)?);
        assembly.push(Layer::attributes(Cow::Owned(attrs.into_map())));
        assembly.finish()
    }

    /// The generic-by-type constructor.
    ///
    /// # Errors
    ///
    /// As [`Record::base_construct`].
    fn construct(attrs: Attrs) -> RecordResult<Self> {
        Self::base_construct(attrs)
    }
}

/// Marker for types whose direct struct-literal construction is forbidden.
///
/// `#[derive(Record)]` implements it for `#[record(forbid_direct_construction)]`.
/// The construction guard treats every implementor it sees as marked, so the
/// trait may also be implemented by hand for types without a derive.
pub trait DirectConstructionForbidden {}

/// Builds the defaults layer for `source`, or `None` when defaults are
/// stripped.
fn defaults_layer<R: Record>(
    source: DefaultSource,
    site: Option<&'static CallSite>,
) -> RecordResult<Option<Layer<'static>>> {
    let defaults = R::schema().defaults_map();
    let values = match (source, site) {
        (DefaultSource::Stripped, _) => return Ok(None),
        (DefaultSource::Declaration, _) => {
            Cow::Borrowed(R::declaration_defaults().frozen(&defaults)?)
        }
        (DefaultSource::CallSite, Some(site)) => Cow::Borrowed(site.frozen(&defaults)?),
        (DefaultSource::CallSite, None) | (DefaultSource::Fresh, _) => {
            Cow::Owned(defaults.evaluate()?)
        }
    };
    Ok(Some(Layer::defaults(source, values)))
}

/// Builds `R` through its generic constructor with no attributes.
///
/// # Errors
///
/// As [`Record::construct`].
pub fn build<R: Record>() -> RecordResult<R> {
    R::construct(Attrs::new())
}

/// Builds `R` through its generic constructor.
///
/// # Errors
///
/// As [`Record::construct`].
pub fn build_with<R: Record>(attrs: Attrs) -> RecordResult<R> {
    R::construct(attrs)
}

/// Generic constructor that recomputes every default on each call.
///
/// Starts from the base assembly (empty values), overlays every default
/// evaluated now, overlays `attrs`, then runs [`Record::base_construct`] on
/// the merged set. The derive routes [`Record::construct`] here for
/// `mode = "override"`.
///
/// # Errors
///
/// As [`Record::base_construct`], plus [`crate::RecordError::Default`] when
/// a default cannot be serialised.
pub fn construct_fresh<R: Record>(attrs: Attrs) -> RecordResult<R> {
    let mut merged = Attrs::from(R::schema().defaults_map().evaluate()?);
    merged.overlay(attrs);
    R::base_construct(merged)
}

/// The factory operation behind generated `new`/`new_with` methods.
///
/// Rejects undeclared attribute keys, evaluates every default fresh
/// whatever the mode, overlays `attrs`, and builds through
/// [`Record::construct`].
///
/// # Errors
///
/// Returns [`crate::RecordError::UnknownField`] naming the first undeclared
/// key, otherwise as [`Record::construct`].
pub fn factory<R: Record>(attrs: Attrs) -> RecordResult<R> {
    let schema = R::schema();
    schema.ensure_known(&attrs)?;
    tracing::trace!(record = schema.type_id(), "running factory");
    let mut merged = Attrs::from(schema.defaults_map().evaluate()?);
    merged.overlay(attrs);
    R::construct(merged)
}

/// Builds `R` for a `literal!` call site.
///
/// Omitted fields take the defaults of the strategy's literal source, with
/// `site` caching per-site evaluations.
pub(crate) fn literal_at<R: Record>(
    site: &'static CallSite,
    fields: Vec<(&'static str, serde_json::Result<Value>)>,
) -> RecordResult<R> {
    let attrs = Attrs::from_fields(fields)?;
    let schema = R::schema();
    let mut assembly = Assembly::for_record(schema)?;
    assembly.push_optional(defaults_layer::<R>(schema.strategy().literal, Some(site))?);
    assembly.push(Layer::attributes(Cow::Owned(attrs.into_map())));
    assembly.finish()
}
