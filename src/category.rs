use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::is_directory;

/// Category manifest, relative to a tree root.
pub const CATEGORIES_FILE: &str = "profiles/categories";
/// Architecture keyword list, relative to a tree root.
pub const ARCH_LIST_FILE: &str = "profiles/arch.list";

/// Listed in the manifest but never a real category of its own.
const PSEUDO_CATEGORY: &str = "virtual";

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file(path, e))
}

/// Whitespace separated tokens with `#` comments removed.
fn manifest_tokens(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(before, _)| before))
        .flat_map(str::split_whitespace)
}

/// Valid top-level categories of a tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    categories: BTreeSet<String>,
}

impl CategoryList {
    /// Read `profiles/categories` under `root`.
    ///
    /// With `validate`, every listed category must exist as a directory; the
    /// first one that does not (in manifest order) is reported as
    /// [`Error::Qa`]. Entries from `user_override`, when that file exists,
    /// are added afterwards without validation.
    pub fn load(root: &Path, validate: bool, user_override: Option<&Path>) -> Result<Self> {
        let manifest = root.join(CATEGORIES_FILE);
        let contents = read_manifest(&manifest)?;

        let mut categories = BTreeSet::new();
        for category in manifest_tokens(&contents) {
            if category == PSEUDO_CATEGORY {
                continue;
            }
            if validate && !is_directory(&root.join(category)) {
                return Err(Error::Qa(format!(
                    "category '{}' is listed in {} but has no directory",
                    category,
                    manifest.display()
                )));
            }
            categories.insert(category.to_string());
        }

        if let Some(path) = user_override.filter(|p| p.is_file()) {
            let extra = read_manifest(path)?;
            let before = categories.len();
            categories.extend(manifest_tokens(&extra).map(str::to_string));
            debug!(
                "{} added {} categories",
                path.display(),
                categories.len() - before
            );
        }

        debug!("{}: {} categories", root.display(), categories.len());
        Ok(CategoryList { categories })
    }

    /// Whether `category` is listed.
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Add every category of `other`.
    pub fn merge(&mut self, other: CategoryList) {
        self.categories.extend(other.categories);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether no entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a CategoryList {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

impl FromIterator<String> for CategoryList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        CategoryList {
            categories: iter.into_iter().collect(),
        }
    }
}

/// Architecture keywords known to a tree (`amd64`, `x86`, `arm64`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchList {
    arches: BTreeSet<String>,
}

impl ArchList {
    /// Read `profiles/arch.list` under `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let contents = read_manifest(&root.join(ARCH_LIST_FILE))?;
        let arches: BTreeSet<String> = manifest_tokens(&contents).map(str::to_string).collect();
        debug!("{}: {} arches", root.display(), arches.len());
        Ok(ArchList { arches })
    }

    /// Whether `arch` is a known architecture.
    pub fn contains(&self, arch: &str) -> bool {
        self.arches.contains(arch)
    }

    /// Whether `keyword` names a known arch, in stable (`amd64`), testing
    /// (`~amd64`) or masked (`-amd64`) form.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        let arch = keyword
            .strip_prefix('~')
            .or_else(|| keyword.strip_prefix('-'))
            .unwrap_or(keyword);
        self.contains(arch)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.arches.len()
    }

    /// Whether no entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.arches.is_empty()
    }

    /// Architectures in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.arches.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn tree(manifest: &str, dirs: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("profiles")).unwrap();
        fs::write(dir.path().join(CATEGORIES_FILE), manifest).unwrap();
        for d in dirs {
            fs::create_dir(dir.path().join(d)).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_categories() {
        let t = tree("app-misc\ndev-libs sys-apps\n\n", &[]);
        let list = CategoryList::load(t.path(), false, None).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.contains("dev-libs"));
        assert_eq!(list.iter().collect::<Vec<_>>(), ["app-misc", "dev-libs", "sys-apps"]);
    }

    #[test]
    fn test_virtual_is_removed() {
        let t = tree("app-misc\nvirtual\n", &["app-misc", "virtual"]);
        let list = CategoryList::load(t.path(), true, None).unwrap();
        assert!(!list.contains("virtual"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_validation_names_first_missing_category() {
        let t = tree("app-misc\nnet-misc\nwww-apps\n", &["app-misc"]);
        let err = CategoryList::load(t.path(), true, None).unwrap_err();
        match err {
            Error::Qa(msg) => {
                assert!(msg.contains("net-misc"), "{}", msg);
                assert!(!msg.contains("www-apps"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // Without validation the same tree loads fine
        assert_eq!(CategoryList::load(t.path(), false, None).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let err = CategoryList::load(dir.path(), false, None).unwrap_err();
        assert!(matches!(err, Error::File { .. }));
    }

    #[test]
    fn test_user_override_is_merged() {
        let t = tree("app-misc\n", &["app-misc"]);
        let user = t.path().join("user-categories");
        fs::write(&user, "local-apps\napp-misc\n").unwrap();

        let list = CategoryList::load(t.path(), true, Some(&user)).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), ["app-misc", "local-apps"]);

        // An absent override file is not an error
        let missing = t.path().join("nope");
        let list = CategoryList::load(t.path(), true, Some(&missing)).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_arch_list() {
        let t = tree("", &[]);
        fs::write(
            t.path().join(ARCH_LIST_FILE),
            "# arches\namd64\nx86 # legacy\n\n# prefix\nx64-macos\n",
        )
        .unwrap();

        let arches = ArchList::load(t.path()).unwrap();
        assert_eq!(arches.len(), 3);
        assert!(arches.contains("x86"));
        assert!(!arches.contains("legacy"));
        assert!(arches.is_keyword("~amd64"));
        assert!(arches.is_keyword("-x86"));
        assert!(!arches.is_keyword("~sparc"));
    }

    #[test]
    fn test_arch_list_missing() {
        let dir = tempdir().unwrap();
        assert!(matches!(ArchList::load(dir.path()), Err(Error::File { .. })));
    }
}
