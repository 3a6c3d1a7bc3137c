//! Newest-ebuild lookup within a single tree.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::locate::locate_exact;
use crate::record::{VersionRecord, VersionSet};
use crate::tree::Tree;

/// Newest version of the package at `category/package` in `tree`.
pub(crate) fn newest_record(tree: &Tree, package: &str) -> Result<VersionRecord> {
    let dir = tree.join(package);
    let versions = VersionSet::from_dir(&dir)?;
    let newest = versions.newest(&dir)?;
    debug!("newest {} in {}: {}", package, tree.root().display(), newest);
    Ok(newest.clone())
}

/// Path of the newest ebuild of `name` (bare or `category/package`) in `tree`.
pub fn newest_ebuild_path(tree: &Tree, name: &str) -> Result<PathBuf> {
    let package = locate_exact(tree, name)?;
    Ok(newest_record(tree, &package)?.path().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testutil::make_tree;
    use tempfile::tempdir;

    #[test]
    fn test_newest_ebuild_path() {
        let dir = tempdir().unwrap();
        make_tree(
            dir.path(),
            &["app-misc"],
            &[
                "app-misc/pkg/pkg-1.0.ebuild",
                "app-misc/pkg/pkg-1.0-r1.ebuild",
                "app-misc/pkg/pkg-1.1.ebuild",
                "app-misc/pkg/pkg-0.9.ebuild",
                "app-misc/pkg/metadata.xml",
            ],
        );
        let tree = Tree::new(dir.path());

        let expected = dir.path().join("app-misc/pkg/pkg-1.1.ebuild");
        assert_eq!(newest_ebuild_path(&tree, "pkg").unwrap(), expected);
        assert_eq!(newest_ebuild_path(&tree, "app-misc/pkg").unwrap(), expected);
    }

    #[test]
    fn test_newest_ebuild_suffix_ranking() {
        let dir = tempdir().unwrap();
        make_tree(
            dir.path(),
            &["dev-lang"],
            &[
                "dev-lang/lua/lua-5.4.6.ebuild",
                "dev-lang/lua/lua-5.4.6_beta2.ebuild",
                "dev-lang/lua/lua-5.4.6_rc1.ebuild",
            ],
        );
        let tree = Tree::new(dir.path());

        assert_eq!(
            newest_ebuild_path(&tree, "lua").unwrap(),
            dir.path().join("dev-lang/lua/lua-5.4.6_rc1.ebuild")
        );
    }

    #[test]
    fn test_newest_ebuild_missing_package() {
        let dir = tempdir().unwrap();
        make_tree(dir.path(), &["app-misc"], &["app-misc/pkg/pkg-1.0.ebuild"]);
        let tree = Tree::new(dir.path());

        assert!(matches!(
            newest_ebuild_path(&tree, "other"),
            Err(Error::PackageNotFound(_))
        ));
        // A category is found, but holds no ebuilds of its own
        assert!(matches!(
            newest_ebuild_path(&tree, "app-misc"),
            Err(Error::PackageNotFound(_))
        ));
    }
}
