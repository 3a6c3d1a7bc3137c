//! Throwaway ebuild trees for tests.

use std::fs;
use std::path::Path;

use crate::category::CATEGORIES_FILE;

/// Lay out a tree under `root`: a `profiles/categories` manifest listing
/// `categories`, a directory per category, and an empty file for every
/// `category/package/file` in `files`.
pub(crate) fn make_tree(root: &Path, categories: &[&str], files: &[&str]) {
    fs::create_dir_all(root.join("profiles")).unwrap();
    fs::write(root.join(CATEGORIES_FILE), categories.join("\n")).unwrap();
    for category in categories {
        fs::create_dir_all(root.join(category)).unwrap();
    }
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
}
