use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::category::{ArchList, CategoryList, CATEGORIES_FILE};
use crate::error::Result;

/// One ebuild tree (the primary tree or an overlay)
///
/// Category and arch lists are read on first use and then kept for the
/// lifetime of the `Tree`. Once initialized they are never mutated, so a
/// `Tree` can be shared between threads by reference.
#[derive(Debug)]
pub struct Tree {
    root: PathBuf,
    parent: Option<PathBuf>,
    validate: bool,
    user_categories: Option<PathBuf>,
    categories: OnceLock<CategoryList>,
    arches: OnceLock<ArchList>,
}

impl Tree {
    /// A primary tree rooted at `root`, without validation or user categories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Tree {
            root: root.into(),
            parent: None,
            validate: false,
            user_categories: None,
            categories: OnceLock::new(),
            arches: OnceLock::new(),
        }
    }

    /// An overlay of the tree at `parent`.
    ///
    /// Overlays rarely carry a category manifest of their own, so they take
    /// the parent's categories plus any listed in their own manifest.
    pub fn overlay(root: impl Into<PathBuf>, parent: &Tree) -> Self {
        Tree {
            parent: Some(parent.root.clone()),
            user_categories: parent.user_categories.clone(),
            ..Tree::new(root)
        }
    }

    /// Check every manifest category against the filesystem when loading.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Merge the categories listed in `path` (if it exists) into this tree's.
    pub fn with_user_categories(mut self, path: Option<PathBuf>) -> Self {
        self.user_categories = path;
        self
    }

    /// Directory the tree lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a `category/package` (or any relative path) in this tree.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// The tree's categories, loaded on first call.
    ///
    /// A failed load is not cached; the next call reads the manifest again.
    pub fn categories(&self) -> Result<&CategoryList> {
        if let Some(categories) = self.categories.get() {
            return Ok(categories);
        }
        let user = self.user_categories.as_deref();
        let loaded = match &self.parent {
            None => CategoryList::load(&self.root, self.validate, user)?,
            Some(parent) => {
                let mut list = CategoryList::load(parent, false, user)?;
                if self.root.join(CATEGORIES_FILE).is_file() {
                    list.merge(CategoryList::load(&self.root, false, None)?);
                }
                list
            }
        };
        Ok(self.categories.get_or_init(|| loaded))
    }

    /// The tree's architecture keywords, loaded on first call. Overlays use
    /// their parent's list.
    pub fn arches(&self) -> Result<&ArchList> {
        if let Some(arches) = self.arches.get() {
            return Ok(arches);
        }
        let loaded = ArchList::load(self.parent.as_deref().unwrap_or(&self.root))?;
        Ok(self.arches.get_or_init(|| loaded))
    }
}
