//! Temporary source trees.
//!
//! Guard tests lay out crates on disk and point the scanner at them. The tree
//! is written through a capability handle so fixtures cannot escape the
//! temporary directory.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tempfile::TempDir;

/// A temporary directory of source files, removed on drop.
///
/// ```
/// use test_helpers::SourceTree;
///
/// let tree = SourceTree::new()?;
/// tree.write("src/lib.rs", "pub struct Empty;")?;
/// assert!(tree.path().join("src/lib.rs").is_file());
/// # Ok::<_, anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct SourceTree {
    root: Utf8PathBuf,
    dir: Dir,
    _temp: TempDir,
}

impl SourceTree {
    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created or
    /// its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temporary source tree")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow!("temporary path {} is not UTF-8", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            root,
            dir,
            _temp: temp,
        })
    }

    /// Absolute path of the tree root.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Capability handle on the tree root.
    #[must_use]
    pub const fn dir(&self) -> &Dir {
        &self.dir
    }

    /// Writes `contents` to `path`, relative to the root, creating parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns an error when a directory or the file cannot be written.
    pub fn write(&self, path: impl AsRef<Utf8Path>, contents: &str) -> Result<Utf8PathBuf> {
        let relative = path.as_ref();
        if let Some(parent) = relative.parent().filter(|parent| !parent.as_str().is_empty()) {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.dir
            .write(relative, contents)
            .with_context(|| format!("write {relative}"))?;
        Ok(self.root.join(relative))
    }

    /// Creates an empty directory at `path`, relative to the root.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn mkdir(&self, path: impl AsRef<Utf8Path>) -> Result<Utf8PathBuf> {
        let relative = path.as_ref();
        self.dir
            .create_dir_all(relative)
            .with_context(|| format!("create {relative}"))?;
        Ok(self.root.join(relative))
    }
}
