//! Filesystem primitives the tree lookups are built on.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Extension carried by every ebuild file.
pub const EBUILD_EXT: &str = ".ebuild";

/// List the entries of a directory, sorted by name.
///
/// Entries are joined onto `path`, so they are absolute only when `path` is;
/// see [`absolute`].
pub fn list_entries(path: &Path) -> Result<Vec<PathBuf>> {
    let read = fs::read_dir(path).map_err(|e| Error::file(path, e))?;
    let mut entries = read
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::file(path, e))?;
    entries.sort();
    Ok(entries)
}

/// Whether `path` exists and is a directory (symlinks are followed).
pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// Whether the final path component looks like an ebuild file name.
pub fn is_ebuild(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > EBUILD_EXT.len() && name.ends_with(EBUILD_EXT))
}

/// A package directory exists and holds at least one ebuild.
pub fn is_package_dir(path: &Path) -> bool {
    if !is_directory(path) {
        return false;
    }
    match list_entries(path) {
        Ok(entries) => entries.iter().any(|entry| is_ebuild(entry)),
        Err(_) => false,
    }
}

/// Make `path` absolute against the current directory without resolving symlinks.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::file(path, e))
}

/// Dotfiles and CVS bookkeeping directories never name packages.
pub(crate) fn is_ignored_entry(name: &str) -> bool {
    name.starts_with('.') || name == "CVS"
}

/// Final path component as UTF-8, if it has one.
pub(crate) fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
