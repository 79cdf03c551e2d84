//! Per-field default policies for record types.
//!
//! Deriving [`Record`] on a named-field struct declares default expressions
//! per field and chooses, through a [`Mode`], which construction paths
//! re-evaluate them and which freeze them:
//!
//! | path | `keep` | `ignore_defaults` | `override` |
//! |---|---|---|---|
//! | [`literal!`] | frozen per type | none | frozen per call site |
//! | [`build`] / [`Record::construct`] | frozen per type | none | fresh |
//! | factory (`T::new`) | fresh | fresh | fresh |
//!
//! ```rust
//! use fresh_defaults::{Attrs, Record, build, literal};
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! static NEXT: AtomicU32 = AtomicU32::new(1);
//!
//! #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize, Record)]
//! #[record(mode = "override")]
//! struct Job {
//!     #[record(default = NEXT.fetch_add(1, Ordering::Relaxed))]
//!     id: u32,
//!     #[record(default = String::from("queued"))]
//!     state: String,
//! }
//!
//! let first: Job = build()?;
//! let second: Job = build()?;
//! assert_ne!(first.id, second.id);
//!
//! let named = Job::new_with(Attrs::new().with("state", &"running")?)?;
//! assert_eq!(named.state, "running");
//!
//! let site = || literal!(Job {});
//! assert_eq!(site()?, site()?);
//! # Ok::<_, fresh_defaults::RecordError>(())
//! ```
//!
//! Direct construction can be banned with
//! `#[record(forbid_direct_construction)]`; the ban is enforced at build
//! time by the `cargo-fresh-guard` crate, which scans source for struct
//! expressions and `literal!` invocations of marked types.

extern crate self as fresh_defaults;

mod assembly;
mod attrs;
mod defaults;
mod error;
mod literal;
mod record;
mod schema;

pub use fresh_defaults_macros::Record;
pub use fresh_defaults_policy::{
    ConfigError, DefaultSource, GuardMarker, Mode, PolicyConfig, Strategy, resolve,
};
pub use serde_json;

pub use assembly::{Assembly, Layer, LayerSource};
pub use attrs::Attrs;
pub use defaults::{CallSite, DefaultsMap};
pub use error::{RecordError, RecordResult};
pub use record::{
    DirectConstructionForbidden, Record, build, build_with, construct_fresh, factory,
};
pub use schema::{FieldSpec, RecordSchema, Thunk};

#[doc(hidden)]
pub mod __private {
    //! Support items for macro expansions. Not part of the public API.

    use serde::Serialize;
    use serde_json::Value;

    use crate::{CallSite, Record, RecordResult};

    pub fn to_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Value> {
        serde_json::to_value(value)
    }

    /// Rejects a `literal!` field list that names a field twice.
    ///
    /// # Panics
    ///
    /// Panics, at compile time when evaluated in a constant, if two names
    /// are equal.
    pub const fn assert_distinct_fields(fields: &[&str]) {
        let mut rest = fields;
        while let [first, tail @ ..] = rest {
            let mut others = tail;
            while let [other, more @ ..] = others {
                assert!(!same_name(first, other), "literal! names a field more than once");
                others = more;
            }
            rest = tail;
        }
    }

    const fn same_name(left: &str, right: &str) -> bool {
        let (mut lhs, mut rhs) = (left.as_bytes(), right.as_bytes());
        loop {
            match (lhs, rhs) {
                ([], []) => return true,
                ([a, lhs_tail @ ..], [b, rhs_tail @ ..]) if *a == *b => {
                    lhs = lhs_tail;
                    rhs = rhs_tail;
                }
                _ => return false,
            }
        }
    }

    pub fn literal_at<R: Record>(
        site: &'static CallSite,
        fields: Vec<(&'static str, serde_json::Result<Value>)>,
    ) -> RecordResult<R> {
        crate::record::literal_at(site, fields)
    }

}
