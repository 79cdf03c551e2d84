//! Command-line interface for `cargo fresh-guard`.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser};

use crate::{GuardError, GuardPipeline, GuardReport};

/// Cargo invokes subcommands as `cargo-fresh-guard fresh-guard ...`.
#[derive(Debug, Parser)]
#[command(name = "cargo", bin_name = "cargo")]
pub enum CargoCli {
    /// Reject direct construction of records that forbid it.
    FreshGuard(GuardArgs),
}

impl CargoCli {
    /// Arguments of the subcommand.
    #[must_use]
    pub fn into_args(self) -> GuardArgs {
        match self {
            Self::FreshGuard(args) => args,
        }
    }
}

/// Arguments for a guard run.
#[derive(Debug, Clone, Args)]
#[command(version, about = "Reject direct construction of fresh_defaults records")]
pub struct GuardArgs {
    /// Source files or directories to scan.
    #[arg(value_name = "path", default_value = "src")]
    pub paths: Vec<Utf8PathBuf>,
    /// Marker manifest written by a dependency (repeatable).
    #[arg(long = "manifest", value_name = "path")]
    pub manifests: Vec<Utf8PathBuf>,
    /// Write the collected markers to this manifest.
    #[arg(long, value_name = "path")]
    pub write_manifest: Option<Utf8PathBuf>,
    /// Exempt `#[automatically_derived]` impls of this trait (repeatable).
    #[arg(long = "exempt-derived", value_name = "trait")]
    pub exempt_derived: Vec<String>,
    /// Scan every derived impl, `Clone` and `Deserialize` included, as found
    /// in `cargo expand` output.
    #[arg(long = "scan-derived")]
    pub should_scan_derived: bool,
}

fn pipeline_for(args: &GuardArgs) -> GuardPipeline {
    let mut pipeline = GuardPipeline::new();
    if args.should_scan_derived {
        pipeline = pipeline.without_exempt_traits();
    }
    for name in &args.exempt_derived {
        pipeline = pipeline.exempt_trait(name.clone());
    }
    for path in &args.manifests {
        pipeline = pipeline.manifest(path.clone());
    }
    for path in &args.paths {
        pipeline = add_path(pipeline, path);
    }
    pipeline
}

fn add_path(pipeline: GuardPipeline, path: &Utf8Path) -> GuardPipeline {
    // A missing `.rs` file is an error; a missing directory scans nothing.
    if path.extension() == Some("rs") && !path.is_dir() {
        pipeline.source_file(path)
    } else {
        pipeline.source_dir(path)
    }
}

/// Runs the guard for `args`, writing a one-line summary to `out`.
///
/// # Errors
///
/// Returns the first forbidden construction, or an I/O, parse or manifest
/// error.
pub fn run(args: &GuardArgs, out: &mut impl Write) -> Result<GuardReport, GuardError> {
    let pipeline = pipeline_for(args);
    let collected = pipeline.collect()?;
    if let Some(path) = &args.write_manifest {
        collected.markers().save(path)?;
    }
    let report = pipeline.scan(collected)?;
    writeln!(
        out,
        "fresh-guard: {} units, {} constructions checked against {} markers",
        report.units,
        report.constructions,
        report.markers.len()
    )
    .map_err(|source| GuardError::Io {
        path: Utf8PathBuf::from("<stdout>"),
        source,
    })?;
    Ok(report)
}
