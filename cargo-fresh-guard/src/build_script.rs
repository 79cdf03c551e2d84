//! Guard runs from a crate's `build.rs`.
//!
//! ```no_run
//! // build.rs
//! fn main() -> Result<(), fresh_defaults_guard::GuardError> {
//!     fresh_defaults_guard::BuildScript::from_env()?.run()?;
//!     Ok(())
//! }
//! ```
//!
//! The run scans `src/` and any Rust files already generated into `OUT_DIR`,
//! then writes the collected markers to `OUT_DIR/fresh-guard-markers.json`
//! and publishes that path as `cargo:fresh_guard_manifest=...` metadata.
//!
//! Cargo forwards build-script metadata only for packages that declare
//! `links`. A crate whose markers should reach its dependents sets, for
//! example, `links = "accounts"` in its `[package]` table; the build scripts
//! of direct dependents then see `DEP_ACCOUNTS_FRESH_GUARD_MANIFEST` and
//! merge it automatically. Manifests from anywhere else can be listed in
//! `FRESH_GUARD_MANIFESTS`, separated like `PATH`.

use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{GuardError, GuardPipeline, GuardReport};

/// File name of the manifest a build-script run writes into `OUT_DIR`.
pub const MARKER_MANIFEST_FILE: &str = "fresh-guard-markers.json";

/// Variable listing manifests written by dependencies.
pub const MANIFESTS_ENV: &str = "FRESH_GUARD_MANIFESTS";

/// Metadata key under which a run publishes its manifest path.
pub const MANIFEST_METADATA_KEY: &str = "fresh_guard_manifest";

/// Suffix of the variables Cargo derives from [`MANIFEST_METADATA_KEY`].
const DEP_MANIFEST_SUFFIX: &str = "_FRESH_GUARD_MANIFEST";

/// Name reported when a dependency's manifest variable is not UTF-8.
const DEP_MANIFEST_VAR: &str = "DEP_<LINKS>_FRESH_GUARD_MANIFEST";

/// A guard run configured for a build script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildScript {
    manifest_dir: Utf8PathBuf,
    out_dir: Utf8PathBuf,
    manifests: Vec<Utf8PathBuf>,
}

fn required_var(name: &'static str) -> Result<Utf8PathBuf, GuardError> {
    env::var(name)
        .map(Utf8PathBuf::from)
        .map_err(|_| GuardError::Env { name })
}

/// Splits a `PATH`-style list, skipping empty entries.
fn split_manifest_list(list: &OsStr) -> Result<Vec<Utf8PathBuf>, GuardError> {
    env::split_paths(list)
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| {
            Utf8PathBuf::from_path_buf(path).map_err(|_| GuardError::Env {
                name: MANIFESTS_ENV,
            })
        })
        .collect()
}

/// Manifest paths published by `links` dependencies, ordered by variable
/// name.
fn dependency_manifests<I>(vars: I) -> Result<Vec<Utf8PathBuf>, GuardError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut published: Vec<(String, OsString)> = vars
        .into_iter()
        .filter_map(|(name, value)| {
            let key = name.into_string().ok()?;
            let is_manifest = key.starts_with("DEP_") && key.ends_with(DEP_MANIFEST_SUFFIX);
            (is_manifest && !value.is_empty()).then_some((key, value))
        })
        .collect();
    published.sort();
    published
        .into_iter()
        .map(|(_, value)| {
            Utf8PathBuf::from_path_buf(PathBuf::from(value)).map_err(|_| GuardError::Env {
                name: DEP_MANIFEST_VAR,
            })
        })
        .collect()
}

impl BuildScript {
    /// Configures a run for the crate at `manifest_dir` writing into
    /// `out_dir`.
    pub fn new(manifest_dir: impl Into<Utf8PathBuf>, out_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            manifest_dir: manifest_dir.into(),
            out_dir: out_dir.into(),
            manifests: Vec::new(),
        }
    }

    /// Reads `CARGO_MANIFEST_DIR`, `OUT_DIR`, `FRESH_GUARD_MANIFESTS` and
    /// the `DEP_*_FRESH_GUARD_MANIFEST` variables of `links` dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Env`] when Cargo's variables are missing, which
    /// happens outside a build script, or when a manifest path is not UTF-8.
    pub fn from_env() -> Result<Self, GuardError> {
        let manifest_dir = required_var("CARGO_MANIFEST_DIR")?;
        let out_dir = required_var("OUT_DIR")?;
        let mut manifests = env::var_os(MANIFESTS_ENV)
            .map_or_else(|| Ok(Vec::new()), |list| split_manifest_list(&list))?;
        manifests.extend(dependency_manifests(env::vars_os())?);
        Ok(Self {
            manifest_dir,
            out_dir,
            manifests,
        })
    }

    /// Adds a dependency manifest.
    #[must_use]
    pub fn manifest(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.manifests.push(path.into());
        self
    }

    /// Path the collected markers are written to.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.out_dir.join(MARKER_MANIFEST_FILE)
    }

    fn source_dir(&self) -> Utf8PathBuf {
        self.manifest_dir.join("src")
    }

    /// Runs the guard, printing Cargo directives to standard output.
    ///
    /// # Errors
    ///
    /// See [`BuildScript::run_with`].
    pub fn run(&self) -> Result<GuardReport, GuardError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out)
    }

    /// Runs the guard, writing Cargo directives to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] for a forbidden construction, and
    /// I/O, parse or manifest errors from the underlying pipeline.
    pub fn run_with(&self, out: &mut impl Write) -> Result<GuardReport, GuardError> {
        let directive_err = |source| GuardError::Io {
            path: Utf8PathBuf::from("<cargo directives>"),
            source,
        };
        let source_dir = self.source_dir();
        writeln!(out, "cargo:rerun-if-changed={source_dir}").map_err(directive_err)?;
        writeln!(out, "cargo:rerun-if-env-changed={MANIFESTS_ENV}").map_err(directive_err)?;
        for path in &self.manifests {
            writeln!(out, "cargo:rerun-if-changed={path}").map_err(directive_err)?;
        }

        let pipeline = self
            .manifests
            .iter()
            .fold(GuardPipeline::new(), |pipeline, path| pipeline.manifest(path.clone()))
            .source_dir(source_dir)
            .source_dir(self.out_dir.clone());
        let collected = pipeline.collect()?;
        let manifest_path = self.manifest_path();
        collected.markers().save(&manifest_path)?;
        tracing::debug!(path = %manifest_path, "wrote marker manifest");
        writeln!(out, "cargo:{MANIFEST_METADATA_KEY}={manifest_path}").map_err(directive_err)?;
        pipeline.scan(collected)
    }

    /// Crate root being checked.
    #[must_use]
    pub fn manifest_dir(&self) -> &Utf8Path {
        &self.manifest_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use test_helpers::SourceTree;
    use test_helpers::env::EnvScope;

    const MARKED: &str = "#[derive(Record)]\n#[record(forbid_direct_construction)]\npub struct Session { id: u64 }\n";

    #[rstest]
    fn from_env_requires_cargo_variables() {
        let mut scope = EnvScope::new();
        scope.remove("CARGO_MANIFEST_DIR").remove("OUT_DIR");
        let err = BuildScript::from_env().expect_err("outside a build script");
        assert!(matches!(err, GuardError::Env { name: "CARGO_MANIFEST_DIR" }), "{err}");
    }

    #[rstest]
    fn from_env_splits_manifest_list() {
        let first = Utf8PathBuf::from("/deps/a/fresh-guard-markers.json");
        let second = Utf8PathBuf::from("/deps/b/fresh-guard-markers.json");
        let joined = env::join_paths([first.as_std_path(), second.as_std_path()])
            .expect("joinable paths");
        let mut scope = EnvScope::new();
        scope
            .set("CARGO_MANIFEST_DIR", "/crate")
            .set("OUT_DIR", "/crate/target/out")
            .set(MANIFESTS_ENV, joined);
        let script = BuildScript::from_env().expect("variables set");
        assert_eq!(
            script,
            BuildScript::new("/crate", "/crate/target/out")
                .manifest(first)
                .manifest(second)
        );
    }

    #[rstest]
    fn run_writes_manifest_and_directives() {
        let tree = SourceTree::new().expect("tree");
        tree.write("src/lib.rs", MARKED).expect("write");
        tree.mkdir("out").expect("mkdir");
        let script = BuildScript::new(tree.path(), tree.path().join("out"));

        let mut directives = Vec::new();
        let report = script.run_with(&mut directives).expect("clean crate");
        assert!(report.markers.is_forbidden("Session"));

        let text = String::from_utf8(directives).expect("utf-8 directives");
        assert!(text.contains(&format!("cargo:rerun-if-changed={}", tree.path().join("src"))));
        assert!(text.contains("cargo:rerun-if-env-changed=FRESH_GUARD_MANIFESTS"));
        assert!(text.contains(&format!(
            "cargo:fresh_guard_manifest={}",
            script.manifest_path()
        )));
        let written = crate::MarkerSet::load(&script.manifest_path()).expect("manifest");
        assert!(written.is_forbidden("Session"));
    }

    #[rstest]
    fn dependency_manifests_are_enforced() {
        let upstream = SourceTree::new().expect("tree");
        upstream.write("src/lib.rs", MARKED).expect("write");
        let upstream_script = BuildScript::new(upstream.path(), upstream.path().join("out"));
        upstream_script
            .run_with(&mut io::sink())
            .expect("upstream is clean");

        let downstream = SourceTree::new().expect("tree");
        downstream
            .write("src/main.rs", "fn main() { let _s = up::Session { id: 7 }; }\n")
            .expect("write");
        let err = BuildScript::new(downstream.path(), downstream.path().join("out"))
            .manifest(upstream_script.manifest_path())
            .run_with(&mut io::sink())
            .expect_err("construction forbidden by the upstream marker");
        let violation = err.as_forbidden().expect("forbidden construction");
        assert_eq!(violation.type_id, "Session");
        assert_eq!(violation.location.line, 1);
    }

    #[rstest]
    fn links_metadata_names_dependency_manifests() {
        let vars = [
            ("PATH", "/usr/bin"),
            ("DEP_UPSTREAM_FRESH_GUARD_MANIFEST", "/out/upstream/fresh-guard-markers.json"),
            ("DEP_OPENSSL_INCLUDE", "/usr/include"),
            ("DEP_ACCOUNTS_FRESH_GUARD_MANIFEST", "/out/accounts/fresh-guard-markers.json"),
            ("DEP_EMPTY_FRESH_GUARD_MANIFEST", ""),
        ]
        .map(|(name, value)| (OsString::from(name), OsString::from(value)));
        assert_eq!(
            dependency_manifests(vars).expect("utf-8 paths"),
            vec![
                Utf8PathBuf::from("/out/accounts/fresh-guard-markers.json"),
                Utf8PathBuf::from("/out/upstream/fresh-guard-markers.json"),
            ]
        );
    }

    #[rstest]
    fn from_env_reads_links_metadata() {
        let published = Utf8PathBuf::from("/deps/accounts/out/fresh-guard-markers.json");
        let mut scope = EnvScope::new();
        scope
            .set("CARGO_MANIFEST_DIR", "/crate")
            .set("OUT_DIR", "/crate/target/out")
            .remove(MANIFESTS_ENV)
            .set("DEP_ACCOUNTS_FRESH_GUARD_MANIFEST", published.as_str());
        let script = BuildScript::from_env().expect("variables set");
        assert_eq!(
            script,
            BuildScript::new("/crate", "/crate/target/out").manifest(published)
        );
    }

    #[rstest]
    fn published_manifests_reach_dependents() {
        let upstream = SourceTree::new().expect("tree");
        upstream.write("src/lib.rs", MARKED).expect("write");
        let mut published = Vec::new();
        BuildScript::new(upstream.path(), upstream.path().join("out"))
            .run_with(&mut published)
            .expect("upstream is clean");
        let text = String::from_utf8(published).expect("utf-8 directives");
        let manifest = text
            .lines()
            .find_map(|line| line.strip_prefix("cargo:fresh_guard_manifest="))
            .expect("manifest metadata");

        let downstream = SourceTree::new().expect("tree");
        downstream
            .write("src/main.rs", "fn main() { let _s = up::Session { id: 7 }; }\n")
            .expect("write");
        let mut scope = EnvScope::new();
        scope
            .set("CARGO_MANIFEST_DIR", downstream.path().as_str())
            .set("OUT_DIR", downstream.path().join("out").as_str())
            .remove(MANIFESTS_ENV)
            .set("DEP_UP_FRESH_GUARD_MANIFEST", manifest);
        let err = BuildScript::from_env()
            .expect("variables set")
            .run_with(&mut io::sink())
            .expect_err("construction forbidden by the published marker");
        assert!(err.as_forbidden().is_some_and(|violation| violation.type_id == "Session"));
    }

    #[rstest]
    fn generated_sources_in_out_dir_are_scanned() {
        let tree = SourceTree::new().expect("tree");
        tree.write("src/lib.rs", MARKED).expect("write");
        tree.write(
            "out/generated.rs",
            "pub fn seed() -> crate::Session {\n    crate::Session { id: 0 }\n}\n",
        )
        .expect("write generated");
        let err = BuildScript::new(tree.path(), tree.path().join("out"))
            .run_with(&mut io::sink())
            .expect_err("generated construction is forbidden");
        let GuardError::Forbidden(violation) = &err else {
            panic!("expected a forbidden construction, got {err}");
        };
        assert!(violation.location.origin.ends_with("generated.rs"), "{err}");
        assert_eq!(violation.location.line, 2);
        assert!(tree.path().join("out").join(MARKER_MANIFEST_FILE).is_file());
    }
}
