//! Persisted direct-construction ban for a single record type.

use serde::{Deserialize, Serialize};

use crate::is_identifier;

/// Marks a record type whose direct construction is forbidden.
///
/// Markers are written to manifests so a guard run in one crate can see
/// types declared in another.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardMarker {
    /// Simple name of the marked type.
    pub type_id: String,
    /// Whether the ban is enforced.
    pub active: bool,
    /// Factory suggested as an alternative, when the type generates one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
}

impl GuardMarker {
    /// Creates an active marker without a factory suggestion.
    #[must_use]
    pub fn active(type_id: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            active: true,
            factory: None,
        }
    }

    /// Builds the marker for a record declaration.
    ///
    /// A marker exists exactly when direct construction is forbidden. The
    /// factory is suggested in diagnostics only when it names a method the
    /// derive would generate.
    #[must_use]
    pub fn declared(
        type_id: impl Into<String>,
        forbid: bool,
        factory: Option<&str>,
    ) -> Option<Self> {
        forbid.then(|| Self {
            type_id: type_id.into(),
            active: true,
            factory: factory
                .filter(|name| is_identifier(name))
                .map(ToOwned::to_owned),
        })
    }

    /// Attaches the factory name suggested in guard diagnostics.
    #[must_use]
    pub fn with_factory(mut self, factory: impl Into<String>) -> Self {
        self.factory = Some(factory.into());
        self
    }

    /// Entry points a caller should use instead of a struct literal.
    #[must_use]
    pub fn alternatives(&self) -> Vec<String> {
        let ty = &self.type_id;
        let mut out = Vec::with_capacity(3);
        if let Some(factory) = &self.factory {
            out.push(format!("{ty}::{factory}()"));
            out.push(format!("{ty}::{factory}_with(attrs)"));
        }
        out.push(format!("fresh_defaults::build::<{ty}>()"));
        out
    }
}
