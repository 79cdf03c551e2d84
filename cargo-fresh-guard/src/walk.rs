//! Source discovery: every `.rs` file below a directory, in a stable order.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;

use crate::fs::open_optional_dir;
use crate::{GuardError, SourceUnit};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

/// Reads every `.rs` file below `root`.
///
/// A missing `root` yields no units. Hidden directories and build output
/// directories are skipped. Files are returned sorted by path.
///
/// # Errors
///
/// Returns [`GuardError::Io`] when a directory or file cannot be read.
pub fn source_units(root: &Utf8Path) -> Result<Vec<SourceUnit>, GuardError> {
    let Some(dir) = open_optional_dir(root)? else {
        tracing::debug!(%root, "source directory missing; nothing to scan");
        return Ok(Vec::new());
    };
    let mut paths = Vec::new();
    walk(&dir, root, Utf8Path::new(""), &mut paths)?;
    paths.sort();
    paths
        .into_iter()
        .map(|(path, relative)| {
            let text = dir.read_to_string(&relative).map_err(|source| GuardError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(SourceUnit::new(path.as_str(), text))
        })
        .collect()
}

/// Collects `(absolute, relative)` paths of Rust files below `relative`.
fn walk(
    dir: &Dir,
    base: &Utf8Path,
    relative: &Utf8Path,
    out: &mut Vec<(Utf8PathBuf, Utf8PathBuf)>,
) -> Result<(), GuardError> {
    let here = base.join(relative);
    let io_err = |source: std::io::Error| GuardError::Io {
        path: here.clone(),
        source,
    };
    let listing = if relative.as_str().is_empty() {
        dir.entries().map_err(io_err)?
    } else {
        dir.read_dir(relative).map_err(io_err)?
    };
    for entry_result in listing {
        let entry = entry_result.map_err(io_err)?;
        let name = entry.file_name().map_err(io_err)?;
        let file_type = entry.file_type().map_err(io_err)?;
        let child = relative.join(&name);
        if file_type.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk(dir, base, &child, out)?;
        } else if file_type.is_file() && child.extension() == Some("rs") {
            out.push((base.join(&child), child));
        }
    }
    Ok(())
}
