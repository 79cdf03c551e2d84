//! Build-time construction guard for `fresh_defaults` records.
//!
//! Records declared with `#[record(forbid_direct_construction)]` must be
//! built through their factory or `fresh_defaults::build`. Rust cannot forbid
//! a struct expression for a type whose fields are visible, so this crate
//! checks source instead, in two phases:
//!
//! 1. **Collect.** Every unit is parsed and scanned for markers: derives
//!    that forbid direct construction, `impl DirectConstructionForbidden`
//!    items, and manifests written by dependencies.
//! 2. **Scan.** The guard is armed with the full marker set and every struct
//!    expression is checked. The first construction of a marked type ends
//!    the run with [`ConstructionForbidden`], naming the location and the
//!    factory entry points to use instead.
//!
//! Struct patterns, destructuring assignments and `matches!` patterns are
//! decompositions and always pass. Derived `Clone` and `Deserialize` impls
//! are exempt, since the runtime builds records through `Deserialize`.
//!
//! Run it from a build script with [`BuildScript`], on demand with
//! `cargo fresh-guard`, or programmatically with [`GuardPipeline`].

mod build_script;
pub mod cli;
mod error;
mod event;
mod fs;
mod guard;
mod markers;
mod pipeline;
mod scan;
mod unit;
mod walk;

pub use build_script::{BuildScript, MANIFEST_METADATA_KEY, MANIFESTS_ENV, MARKER_MANIFEST_FILE};
pub use error::{ConstructionForbidden, GuardError, Location};
pub use event::{Event, EventKind};
pub use guard::{ConstructionGuard, GuardState};
pub use markers::{MANIFEST_VERSION, MarkerSet};
pub use pipeline::{Collected, GuardPipeline, GuardReport};
pub use scan::{DEFAULT_EXEMPT_TRAITS, scan_file};
pub use unit::SourceUnit;
pub use walk::source_units;
