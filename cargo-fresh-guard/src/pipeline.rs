//! The two-phase guard run.
//!
//! Phase one parses every unit and collects markers from all of them, plus
//! any manifests written by dependencies. Phase two arms the guard and scans
//! the units in order. A type marked in a later unit is still enforced in an
//! earlier one.

use std::collections::BTreeSet;

use camino::Utf8PathBuf;

use crate::scan::{DEFAULT_EXEMPT_TRAITS, scan_file};
use crate::walk::source_units;
use crate::{ConstructionGuard, GuardError, MarkerSet, SourceUnit};

/// Configures and runs a guard pass over a set of source units.
#[derive(Clone, Debug)]
pub struct GuardPipeline {
    units: Vec<SourceUnit>,
    source_files: Vec<Utf8PathBuf>,
    source_dirs: Vec<Utf8PathBuf>,
    manifests: Vec<Utf8PathBuf>,
    exempt_traits: BTreeSet<String>,
}

impl Default for GuardPipeline {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            source_files: Vec::new(),
            source_dirs: Vec::new(),
            manifests: Vec::new(),
            exempt_traits: DEFAULT_EXEMPT_TRAITS
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }
}

/// Units parsed and markers collected by the first phase.
pub struct Collected {
    parsed: Vec<(SourceUnit, syn::File)>,
    markers: MarkerSet,
}

impl Collected {
    /// Markers gathered from units and manifests.
    #[must_use]
    pub const fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    /// Units in scan order.
    pub fn units(&self) -> impl Iterator<Item = &SourceUnit> {
        self.parsed.iter().map(|(unit, _)| unit)
    }
}

/// Summary of a guard run that found no violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardReport {
    /// Units scanned.
    pub units: usize,
    /// Structural events checked.
    pub events: usize,
    /// Events that were constructions.
    pub constructions: usize,
    /// Markers the guard enforced.
    pub markers: MarkerSet,
}

impl GuardPipeline {
    /// Creates a pipeline with the default exempt traits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit.
    #[must_use]
    pub fn unit(mut self, unit: SourceUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Adds several units.
    #[must_use]
    pub fn units(mut self, units: impl IntoIterator<Item = SourceUnit>) -> Self {
        self.units.extend(units);
        self
    }

    /// Adds the file at `path`, read when the pipeline runs.
    #[must_use]
    pub fn source_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.source_files.push(path.into());
        self
    }

    /// Adds every `.rs` file below `dir`.
    #[must_use]
    pub fn source_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.source_dirs.push(dir.into());
        self
    }

    /// Merges the markers of a manifest written by another crate.
    #[must_use]
    pub fn manifest(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.manifests.push(path.into());
        self
    }

    /// Exempts `#[automatically_derived]` impls of `name` from scanning.
    #[must_use]
    pub fn exempt_trait(mut self, name: impl Into<String>) -> Self {
        self.exempt_traits.insert(name.into());
        self
    }

    /// Scans derived impls of every trait, `Clone` and `Deserialize`
    /// included.
    #[must_use]
    pub fn without_exempt_traits(mut self) -> Self {
        self.exempt_traits.clear();
        self
    }

    /// Runs the first phase: reads and parses every unit and collects
    /// markers.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Io`] or [`GuardError::Parse`] when a unit
    /// cannot be read or parsed, and [`GuardError::Manifest`] when a manifest
    /// is invalid.
    pub fn collect(&self) -> Result<Collected, GuardError> {
        let mut units = self.units.clone();
        for path in &self.source_files {
            units.push(SourceUnit::from_file(path)?);
        }
        for dir in &self.source_dirs {
            units.extend(source_units(dir)?);
        }
        let mut markers = MarkerSet::new();
        for path in &self.manifests {
            markers.merge(MarkerSet::load(path)?);
        }
        let mut parsed = Vec::with_capacity(units.len());
        for unit in units {
            let file = unit.parse()?;
            markers.collect_from(&file);
            parsed.push((unit, file));
        }
        tracing::debug!(
            units = parsed.len(),
            markers = markers.len(),
            "marker collection finished"
        );
        Ok(Collected { parsed, markers })
    }

    /// Runs both phases.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] for the first forbidden construction
    /// in unit order, or any error from [`GuardPipeline::collect`].
    pub fn run(&self) -> Result<GuardReport, GuardError> {
        let collected = self.collect()?;
        self.scan(collected)
    }

    /// Runs the second phase over already collected units.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] for the first forbidden
    /// construction.
    pub fn scan(&self, collected: Collected) -> Result<GuardReport, GuardError> {
        let Collected { parsed, markers } = collected;
        let mut guard = ConstructionGuard::new();
        guard.arm(markers.clone());
        let mut report = GuardReport {
            units: 0,
            events: 0,
            constructions: 0,
            markers,
        };
        for (unit, file) in &parsed {
            let events = scan_file(unit.origin(), file, &self.exempt_traits);
            tracing::trace!(origin = unit.origin(), events = events.len(), "scanned unit");
            report.events += guard.check_all(&events)?;
            report.constructions += events.iter().filter(|event| event.is_construction()).count();
            report.units += 1;
        }
        tracing::debug!(
            units = report.units,
            events = report.events,
            "construction guard passed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn markers_from_later_units_apply_to_earlier_ones() {
        let pipeline = GuardPipeline::new()
            .unit(SourceUnit::new(
                "a.rs",
                "fn make() -> Session { Session { id: 1 } }",
            ))
            .unit(SourceUnit::new(
                "b.rs",
                "#[derive(Record)]\n#[record(forbid_direct_construction)]\npub struct Session { id: u64 }",
            ));
        let err = pipeline.run().expect_err("construction in a.rs is forbidden");
        let violation = err.as_forbidden().expect("forbidden construction");
        assert_eq!(violation.location.origin, "a.rs");
    }

    #[rstest]
    fn clean_runs_report_counts() {
        let report = GuardPipeline::new()
            .unit(SourceUnit::new(
                "lib.rs",
                "struct P { x: u8 }\nfn f() -> P { let p = P { x: 1 }; let P { x } = p; P { x } }",
            ))
            .run()
            .expect("no markers, no violations");
        assert_eq!(report.units, 1);
        assert_eq!(report.events, 3);
        assert_eq!(report.constructions, 2);
        assert!(report.markers.is_empty());
    }

    #[rstest]
    fn derived_impls_are_scanned_when_exemptions_are_cleared() {
        let source = "impl DirectConstructionForbidden for S {}\n\
                      #[automatically_derived]\n\
                      impl Clone for S { fn clone(&self) -> Self { S {} } }";
        let pipeline = GuardPipeline::new().unit(SourceUnit::new("lib.rs", source));
        assert!(pipeline.run().is_ok());
        let strict = pipeline.without_exempt_traits();
        assert!(strict.run().is_err());
    }
}
