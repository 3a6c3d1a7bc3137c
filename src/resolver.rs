use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::ebuild::newest_record;
use crate::error::{Error, Result};
use crate::fs::{absolute, is_directory, is_package_dir};
use crate::locate::{find_exact, locate_regex};
use crate::record::VersionSet;
use crate::tree::Tree;

/// A `category/package` path together with the tree it was found in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageMatch {
    pub root: PathBuf,
    pub package: String,
}

impl PackageMatch {
    /// Match for `package` (`category/package`) under `root`.
    pub fn new(root: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        PackageMatch {
            root: root.into(),
            package: package.into(),
        }
    }

    /// Absolute path of the package directory.
    pub fn path(&self) -> PathBuf {
        self.root.join(&self.package)
    }
}

impl fmt::Display for PackageMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.root.display())
    }
}

/// Package lookup across the primary tree and its overlays
///
/// Overlays are searched in configured order. For existence, the last
/// overlay holding a package wins, and any overlay beats the primary tree.
#[derive(Debug)]
pub struct TreeResolver {
    primary: Tree,
    overlays: Vec<Tree>,
}

impl TreeResolver {
    /// Set up the trees named by `config`.
    ///
    /// The primary tree must exist; overlay roots that do not are skipped.
    /// Relative roots are made absolute against the current directory.
    pub fn new(config: &Config) -> Result<Self> {
        if !is_directory(&config.portdir) {
            return Err(Error::Config(format!(
                "PORTDIR {} is not a directory",
                config.portdir.display()
            )));
        }

        let primary = Tree::new(absolute(&config.portdir)?)
            .with_validation(config.validate_categories)
            .with_user_categories(config.user_categories.clone());

        let overlays = config
            .overlays
            .iter()
            .filter(|root| {
                let exists = is_directory(root);
                if !exists {
                    warn!("ignoring missing overlay {}", root.display());
                }
                exists
            })
            .map(|root| Ok(Tree::overlay(absolute(root)?, &primary)))
            .collect::<Result<Vec<_>>>()?;

        Ok(TreeResolver { primary, overlays })
    }

    /// The tree named by `PORTDIR`.
    pub fn primary(&self) -> &Tree {
        &self.primary
    }

    /// Overlays that exist, in search order.
    pub fn overlays(&self) -> &[Tree] {
        &self.overlays
    }

    fn tree(&self, root: &Path) -> &Tree {
        self.overlays
            .iter()
            .find(|tree| tree.root() == root)
            .unwrap_or(&self.primary)
    }

    fn searched(&self, search_overlays: bool) -> &[Tree] {
        if search_overlays {
            &self.overlays
        } else {
            &[]
        }
    }

    /// Resolve `name` to a single package.
    ///
    /// A match in any overlay supersedes one in the primary tree.
    /// [`Error::AmbiguousPackage`] from any searched tree is returned as is.
    pub fn resolve_exact(&self, name: &str, search_overlays: bool) -> Result<PackageMatch> {
        let primary = find_exact(&self.primary, name)?;

        let mut overlay = None;
        for tree in self.searched(search_overlays) {
            if let Some(package) = find_exact(tree, name)? {
                debug!("{} found in overlay {}", package, tree.root().display());
                overlay = Some(PackageMatch::new(tree.root(), package));
            }
        }

        match (overlay, primary) {
            (Some(found), _) => Ok(found),
            (None, Some(package)) => Ok(PackageMatch::new(self.primary.root(), package)),
            (None, None) => Err(Error::PackageNotFound(name.to_string())),
        }
    }

    /// Every package matching `pattern`, primary tree first.
    ///
    /// A package present in several trees is listed once per tree.
    pub fn resolve_regex(
        &self,
        pattern: &Regex,
        search_overlays: bool,
    ) -> Result<Vec<PackageMatch>> {
        let mut matches = Vec::new();
        for tree in std::iter::once(&self.primary).chain(self.searched(search_overlays)) {
            matches.extend(
                locate_regex(tree, pattern)?
                    .into_iter()
                    .map(|package| PackageMatch::new(tree.root(), package)),
            );
        }

        if matches.is_empty() {
            return Err(Error::PackageNotFound(format!("/{}/", pattern)));
        }
        Ok(matches)
    }

    /// [`resolve_regex`](Self::resolve_regex) with a pattern still to be compiled.
    pub fn search(&self, pattern: &str, search_overlays: bool) -> Result<Vec<PackageMatch>> {
        let pattern = Regex::new(pattern)?;
        self.resolve_regex(&pattern, search_overlays)
    }

    /// Path of the newest ebuild of `name`.
    ///
    /// When an overlay provides the package, its newest ebuild is only chosen
    /// if it is at least as new as the primary tree's.
    pub fn newest_ebuild_path(&self, name: &str, search_overlays: bool) -> Result<PathBuf> {
        let found = self.resolve_exact(name, search_overlays)?;
        let tree = self.tree(&found.root);
        let newest = newest_record(tree, &found.package)?;

        if found.root == self.primary.root() {
            return Ok(newest.path().to_path_buf());
        }

        let Some(package) = find_exact(&self.primary, &found.package)? else {
            return Ok(newest.path().to_path_buf());
        };

        let primary_versions = VersionSet::from_dir(&self.primary.join(&package))?;
        let Some(primary_newest) = primary_versions.back() else {
            debug!("{} in {} has no usable ebuilds", package, self.primary.root().display());
            return Ok(newest.path().to_path_buf());
        };

        if *primary_newest > newest {
            debug!(
                "{} {} in {} outranks overlay {}",
                package,
                primary_newest,
                self.primary.root().display(),
                newest
            );
            Ok(primary_newest.path().to_path_buf())
        } else {
            Ok(newest.path().to_path_buf())
        }
    }

    /// Every version of `name` across the primary tree and, if asked, all
    /// overlays that carry the same `category/package`.
    ///
    /// Versions present in several trees are reported once, from the first
    /// tree holding them (primary tree, then overlays in order).
    pub fn versions(&self, name: &str, search_overlays: bool) -> Result<VersionSet> {
        let found = self.resolve_exact(name, search_overlays)?;

        let mut versions = VersionSet::new();
        for tree in std::iter::once(&self.primary).chain(self.searched(search_overlays)) {
            let dir = tree.join(&found.package);
            if is_package_dir(&dir) {
                versions.append(&dir)?;
            }
        }
        Ok(versions)
    }
}
