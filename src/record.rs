use std::cmp::Ordering;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{trace, warn};

use crate::components::VersionComponents;
use crate::error::{Error, Result};
use crate::fs::{is_ebuild, list_entries};
use crate::version::{NumericVersion, Revision, Suffix};

/// Historical revision tie-break: equal revisions count as "less".
fn revision_precedes(a: Revision, b: Revision) -> bool {
    a <= b
}

/// A single ebuild: its path plus its fully ordered version
///
/// Ordering compares the numeric version, then the suffix, then the
/// revision. The path is descriptive only and takes no part in equality.
#[derive(Debug, Clone)]
pub struct VersionRecord {
    path: PathBuf,
    components: VersionComponents,
    suffix: Suffix,
    numeric: NumericVersion,
}

impl VersionRecord {
    /// Parse the version encoded in an ebuild path.
    pub fn parse(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let components = VersionComponents::parse(&path.to_string_lossy())?;
        let suffix = Suffix::parse(components.pv());
        let numeric = NumericVersion::parse(components.pv());
        Ok(VersionRecord {
            path,
            components,
            suffix,
            numeric,
        })
    }

    /// Ebuild file the version was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name and version fields split out of the file name.
    pub fn components(&self) -> &VersionComponents {
        &self.components
    }

    /// Release-stage suffix of the version.
    pub fn suffix(&self) -> &Suffix {
        &self.suffix
    }

    /// Dotted numeric part of the version.
    pub fn numeric(&self) -> &NumericVersion {
        &self.numeric
    }

    /// Ebuild revision.
    pub fn revision(&self) -> Revision {
        self.components.revision()
    }

    /// Historical less-than predicate, kept for callers that reproduce
    /// previously sorted output.
    ///
    /// Differs from [`Ord`] in two places: [`Suffix::precedes`] answers `true`
    /// for two sub-version-less suffixes of the same stage, and equal
    /// revisions also answer `true` (see `revision_precedes`).
    pub fn precedes(&self, other: &Self) -> bool {
        if self.numeric != other.numeric {
            return self.numeric < other.numeric;
        }
        if self.suffix.precedes(&other.suffix) {
            return true;
        }
        if self.suffix == other.suffix {
            return revision_precedes(self.revision(), other.revision());
        }
        false
    }
}

/// Canonical version string, hiding a zero revision (`1.0`, `1.0_rc1-r2`).
impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.components)
    }
}

impl PartialEq for VersionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.numeric == other.numeric
            && self.suffix == other.suffix
            && self.revision() == other.revision()
    }
}

impl Eq for VersionRecord {}

impl PartialOrd for VersionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.numeric
            .cmp(&other.numeric)
            .then_with(|| self.suffix.cmp(&other.suffix))
            .then_with(|| self.revision().cmp(&other.revision()))
    }
}

/// Sorted set of the ebuild versions found in package directories
///
/// Records that compare equal collapse to the first one inserted, even when
/// their paths differ.
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    records: BTreeSet<VersionRecord>,
}

impl VersionSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from one package directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut set = Self::new();
        set.append(dir)?;
        Ok(set)
    }

    /// Replace the contents with the ebuilds of `dir`.
    pub fn assign(&mut self, dir: &Path) -> Result<()> {
        self.records.clear();
        self.append(dir)
    }

    /// Add the ebuilds of `dir` to the set.
    ///
    /// Unparsable ebuild names are logged and skipped.
    pub fn append(&mut self, dir: &Path) -> Result<()> {
        for entry in list_entries(dir)? {
            if !is_ebuild(&entry) {
                continue;
            }
            match VersionRecord::parse(&entry) {
                Ok(record) => {
                    trace!("found {} in {}", record, dir.display());
                    self.records.insert(record);
                }
                Err(e) => warn!("skipping {}: {}", entry.display(), e),
            }
        }
        Ok(())
    }

    /// Insert a single record, returning `false` if an equal one was present.
    pub fn insert(&mut self, record: VersionRecord) -> bool {
        self.records.insert(record)
    }

    /// Oldest version.
    pub fn front(&self) -> Option<&VersionRecord> {
        self.records.first()
    }

    /// Newest version.
    pub fn back(&self) -> Option<&VersionRecord> {
        self.records.last()
    }

    /// Find a version by its display string (`1.0`, `1.0-r1`); an explicit
    /// `-r0` is accepted too.
    pub fn find(&self, pvr: &str) -> Option<&VersionRecord> {
        let wanted = pvr.strip_suffix("-r0").unwrap_or(pvr);
        self.records.iter().find(|r| r.to_string() == wanted)
    }

    /// Number of distinct versions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no versions.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> btree_set::Iter<'_, VersionRecord> {
        self.records.iter()
    }

    /// Newest record, or [`Error::PackageNotFound`] naming `dir` when empty.
    pub(crate) fn newest(&self, dir: &Path) -> Result<&VersionRecord> {
        self.back()
            .ok_or_else(|| Error::PackageNotFound(format!("no ebuilds in {}", dir.display())))
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a VersionRecord;
    type IntoIter = btree_set::Iter<'a, VersionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<VersionRecord> for VersionSet {
    fn from_iter<I: IntoIterator<Item = VersionRecord>>(iter: I) -> Self {
        VersionSet {
            records: iter.into_iter().collect(),
        }
    }
}
