//! Package lookup within a single tree.

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::fs::{file_name, is_directory, is_ignored_entry, is_package_dir, list_entries};
use crate::tree::Tree;

/// Resolve `name` to a `category/package` path in `tree`, if it is there.
///
/// - `category/package` is checked as given.
/// - A bare name matching a top-level directory of the tree is taken to be a
///   category and returned unchanged.
/// - Otherwise every category is searched for a package directory called
///   `name`. More than one hit is [`Error::AmbiguousPackage`].
pub fn find_exact(tree: &Tree, name: &str) -> Result<Option<String>> {
    let name = name.trim_end_matches('/');
    if name.is_empty() || name.starts_with('/') {
        return Ok(None);
    }

    if name.contains('/') {
        let found = is_package_dir(&tree.join(name));
        trace!("{} in {}: {}", name, tree.root().display(), found);
        return Ok(found.then(|| name.to_string()));
    }

    if is_directory(&tree.join(name)) {
        debug!("{} is a category of {}", name, tree.root().display());
        return Ok(Some(name.to_string()));
    }

    let mut candidates: Vec<String> = tree
        .categories()?
        .iter()
        .map(|category| format!("{}/{}", category, name))
        .filter(|candidate| is_package_dir(&tree.join(candidate)))
        .collect();

    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => Err(Error::AmbiguousPackage {
            name: name.to_string(),
            candidates,
        }),
    }
}

/// Like [`find_exact`], failing with [`Error::PackageNotFound`] on a miss.
pub fn locate_exact(tree: &Tree, name: &str) -> Result<String> {
    find_exact(tree, name)?.ok_or_else(|| {
        Error::PackageNotFound(format!("{} in {}", name, tree.root().display()))
    })
}

/// Every `category/package` in `tree` matching `pattern`.
///
/// A package matches when the pattern matches either its bare name or its
/// full `category/package` path. Patterns that start with a literal
/// `category/` only search that category. No match is an empty result, not
/// an error.
pub fn locate_regex(tree: &Tree, pattern: &Regex) -> Result<Vec<String>> {
    let categories: Vec<&str> = match literal_category(pattern.as_str()) {
        Some(category) if is_directory(&tree.join(category)) => vec![category],
        _ => tree.categories()?.iter().collect(),
    };

    let mut matches = Vec::new();
    for category in categories {
        let dir = tree.join(category);
        if !is_directory(&dir) {
            trace!("skipping missing category {}", dir.display());
            continue;
        }
        for entry in list_entries(&dir)? {
            let Some(package) = file_name(&entry) else {
                continue;
            };
            if is_ignored_entry(package) || !is_directory(&entry) {
                continue;
            }
            let full = format!("{}/{}", category, package);
            if pattern.is_match(package) || pattern.is_match(&full) {
                matches.push(full);
            }
        }
    }

    debug!(
        "/{}/ matched {} packages in {}",
        pattern,
        matches.len(),
        tree.root().display()
    );
    Ok(matches)
}

/// The category of a pattern of the form `literal-category/...`.
fn literal_category(pattern: &str) -> Option<&str> {
    let (prefix, _) = pattern.split_once('/')?;
    let literal = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    literal.then_some(prefix)
}
