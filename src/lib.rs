//! Ebuild version ordering and package lookup for Portage trees
//!
//! This crate orders the versions encoded in ebuild file names and finds
//! packages in a primary ebuild tree and any number of overlays.
//!
//! # Examples
//!
//! Split an ebuild file name into its fields:
//! ```
//! use portage_tree::VersionComponents;
//!
//! let c = VersionComponents::parse("gtk-engines-xfce-2.6_rc1-r2.ebuild").unwrap();
//! assert_eq!(c.pn(), "gtk-engines-xfce");
//! assert_eq!(c.pv(), "2.6_rc1");
//! assert_eq!(c.pr(), "r2");
//! ```
//!
//! Compare two ebuilds:
//! ```
//! use portage_tree::VersionRecord;
//!
//! let old = VersionRecord::parse("foo-1.0-r3.ebuild").unwrap();
//! let new = VersionRecord::parse("foo-1.0_p1.ebuild").unwrap();
//! assert!(old < new);
//! assert_eq!(old.to_string(), "1.0-r3");
//! ```
//!
//! Find the newest ebuild of a package, looking in overlays too:
//! ```no_run
//! use portage_tree::{Config, TreeResolver};
//!
//! let config = Config::new("/var/db/repos/gentoo").with_overlay("/var/db/repos/local");
//! let resolver = TreeResolver::new(&config).unwrap();
//! let ebuild = resolver.newest_ebuild_path("portage", true).unwrap();
//! println!("{}", ebuild.display());
//! ```

mod category;
mod components;
mod config;
mod ebuild;
mod error;
pub mod fs;
mod locate;
mod record;
mod resolver;
mod tree;
mod version;

#[cfg(test)]
mod testutil;

// Re-export main types
pub use category::{ArchList, CategoryList, ARCH_LIST_FILE, CATEGORIES_FILE};
pub use components::VersionComponents;
pub use config::{parse_make_conf, Config};
pub use ebuild::newest_ebuild_path;
pub use error::{Error, Result};
pub use locate::{find_exact, locate_exact, locate_regex};
pub use record::{VersionRecord, VersionSet};
pub use resolver::{PackageMatch, TreeResolver};
pub use tree::Tree;
pub use version::{Group, NumericVersion, Revision, Suffix, SuffixKind};
