//! Filesystem helpers shared across guard modules.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use std::io::Write;

use crate::GuardError;

fn io_error(path: &Utf8Path) -> impl FnOnce(std::io::Error) -> GuardError + '_ {
    move |source| GuardError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Splits `path` into its parent directory and file name.
fn split(path: &Utf8Path) -> Result<(&Utf8Path, &str), GuardError> {
    let name = path.file_name().ok_or_else(|| GuardError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, name))
}

/// Opens a directory if it exists, returning `None` when the path is missing.
pub(crate) fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, GuardError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error(path)(err)),
    }
}

/// Reads a UTF-8 file.
pub(crate) fn read_utf8(path: &Utf8Path) -> Result<String, GuardError> {
    let (parent, name) = split(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error(path))?;
    dir.read_to_string(name).map_err(io_error(path))
}

/// Writes `contents` to `path`, creating the parent directory when needed.
pub(crate) fn write_utf8(path: &Utf8Path, contents: &str) -> Result<Utf8PathBuf, GuardError> {
    let (parent, name) = split(path)?;
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(io_error(parent))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error(parent))?;
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(io_error(path))?;
    file.write_all(contents.as_bytes()).map_err(io_error(path))?;
    Ok(path.to_path_buf())
}
