//! Default expression maps and the caches that freeze their values.

use std::sync::OnceLock;

use serde_json::{Map, Value};

use crate::{RecordError, RecordResult, RecordSchema, Thunk};

/// Field name → default expression, derived from a [`RecordSchema`].
///
/// Evaluation runs every thunk again; nothing is cached here. Freezing is
/// the job of [`CallSite`].
#[derive(Clone, Debug)]
pub struct DefaultsMap {
    record: &'static str,
    entries: Vec<(&'static str, Thunk)>,
}

impl DefaultsMap {
    /// Collects the declared defaults of `schema`, in declaration order.
    #[must_use]
    pub fn from_schema(schema: &RecordSchema) -> Self {
        let entries = schema
            .fields()
            .iter()
            .filter_map(|field| field.default_thunk().map(|thunk| (field.name(), thunk)))
            .collect();
        Self {
            record: schema.type_id(),
            entries,
        }
    }

    /// Record the defaults belong to.
    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }

    /// Number of fields with a default.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field declares a default.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the fields with a default.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Default expression for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Thunk> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, thunk)| *thunk)
    }

    /// Evaluates every default expression now.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Default`] when a default value cannot be
    /// serialised.
    pub fn evaluate(&self) -> RecordResult<Map<String, Value>> {
        tracing::trace!(
            record = self.record,
            fields = self.entries.len(),
            "evaluating default expressions"
        );
        self.entries
            .iter()
            .map(|(name, thunk)| {
                thunk()
                    .map(|value| ((*name).to_owned(), value))
                    .map_err(|source| RecordError::Default {
                        field: (*name).to_owned(),
                        record: self.record,
                        source,
                    })
            })
            .collect()
    }
}

/// One frozen evaluation of a record's defaults.
///
/// `literal!` keeps one `CallSite` per invocation site and every record keeps
/// one for its declaration-time defaults. The first successful evaluation
/// wins; concurrent first callers all observe the winner's values.
#[derive(Debug, Default)]
pub struct CallSite {
    frozen: OnceLock<Map<String, Value>>,
}

impl CallSite {
    /// Creates an empty cache, suitable for a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frozen: OnceLock::new(),
        }
    }

    /// Returns the frozen defaults, evaluating them on first use.
    ///
    /// A failed evaluation leaves the cache empty so the next call retries
    /// the expressions.
    ///
    /// # Errors
    ///
    /// Propagates [`DefaultsMap::evaluate`] failures.
    pub fn frozen(&self, defaults: &DefaultsMap) -> RecordResult<&Map<String, Value>> {
        if let Some(values) = self.frozen.get() {
            return Ok(values);
        }
        let evaluated = defaults.evaluate()?;
        tracing::debug!(record = defaults.record(), "freezing default values");
        Ok(self.frozen.get_or_init(|| evaluated))
    }

    /// Whether the defaults have been evaluated and frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldSpec;
    use fresh_defaults_policy::PolicyConfig;
    use rstest::rstest;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn tick() -> serde_json::Result<Value> {
        Ok(Value::from(COUNTER.fetch_add(1, Ordering::Relaxed)))
    }

    static FIELDS: [FieldSpec; 2] = [
        FieldSpec::new("tick").with_default(tick),
        FieldSpec::new("label"),
    ];

    static SCHEMA: RecordSchema = RecordSchema::new("Ticker", &FIELDS, PolicyConfig::new());

    #[rstest]
    fn only_fields_with_defaults_are_mapped() {
        let defaults = SCHEMA.defaults_map();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults.names().collect::<Vec<_>>(), ["tick"]);
        assert!(defaults.get("label").is_none());
    }

    #[rstest]
    fn evaluate_runs_thunks_every_time() {
        let defaults = SCHEMA.defaults_map();
        let first = defaults.evaluate().expect("first evaluation");
        let second = defaults.evaluate().expect("second evaluation");
        assert_ne!(first.get("tick"), second.get("tick"));
    }

    #[rstest]
    fn call_site_freezes_the_first_evaluation() {
        let site = CallSite::new();
        let defaults = SCHEMA.defaults_map();
        assert!(!site.is_frozen());
        let first = site.frozen(&defaults).expect("freeze").clone();
        let second = site.frozen(&defaults).expect("reuse").clone();
        assert!(site.is_frozen());
        assert_eq!(first, second);
    }
}
