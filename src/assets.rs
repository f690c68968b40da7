//! Mirror static directories and single files into the output tree.
//!
//! Asset categories are optional: a source that does not exist is skipped
//! without error.

use crate::error::BuildError;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// A whole-subtree mirror, resolved when run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTask {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl CopyTask {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Run the mirror, returning the number of files copied.
    pub fn run(&self) -> Result<usize, BuildError> {
        copy_tree(&self.source, &self.dest)
    }
}

/// Recursively copy `src` into `dest`, preserving structure and bytes.
///
/// Returns the number of files copied; `0` if `src` is not a directory.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize, BuildError> {
    if !src.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.map_err(|err| BuildError::io(src, err.into()))?;
        let name = entry.file_name().to_str().unwrap_or_default();
        if IGNORED_FILES.contains(&name) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| BuildError::io(entry.path(), std::io::Error::other(err)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|err| BuildError::io(&target, err))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
            }
            fs::copy(entry.path(), &target).map_err(|err| BuildError::io(entry.path(), err))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy one optional file. Returns `false` if `src` does not exist.
pub fn copy_file(src: &Path, dest: &Path) -> Result<bool, BuildError> {
    if !src.is_file() {
        return Ok(false);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| BuildError::io(parent, err))?;
    }
    fs::copy(src, dest).map_err(|err| BuildError::io(src, err))?;
    Ok(true)
}
