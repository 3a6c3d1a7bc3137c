//! End-to-end lookups over a primary tree and two overlays.

use std::fs;
use std::path::Path;

use portage_tree::{Config, Error, PackageMatch, TreeResolver, CATEGORIES_FILE};
use regex::Regex;
use tempfile::{tempdir, TempDir};

fn touch(root: &Path, file: &str) {
    let path = root.join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "# ebuild\n").unwrap();
}

fn setup() -> (TempDir, Config) {
    let dir = tempdir().unwrap();
    let gentoo = dir.path().join("gentoo");
    let local = dir.path().join("local");
    let extra = dir.path().join("extra");

    fs::create_dir_all(gentoo.join("profiles")).unwrap();
    fs::write(
        gentoo.join(CATEGORIES_FILE),
        "app-editors\ndev-libs\nsys-apps\nvirtual\n",
    )
    .unwrap();
    for file in [
        "app-editors/vim/vim-9.0.2167.ebuild",
        "app-editors/vim/vim-9.1.0.ebuild",
        "app-editors/vim/metadata.xml",
        "dev-libs/libxml2/libxml2-2.11.7.ebuild",
        "dev-libs/libxml2/libxml2-2.12.6-r1.ebuild",
        "sys-apps/sed/sed-4.9.ebuild",
        "virtual/editor/editor-0-r5.ebuild",
    ] {
        touch(&gentoo, file);
    }

    for file in [
        "app-editors/vim/vim-9.1.0_p1.ebuild",
        "dev-libs/libfoo/libfoo-0.1.ebuild",
    ] {
        touch(&local, file);
    }
    for file in [
        "dev-libs/libxml2/libxml2-2.10.ebuild",
        "dev-libs/libfoo/libfoo-0.2_beta1.ebuild",
    ] {
        touch(&extra, file);
    }

    let config = Config::new(&gentoo)
        .with_validation(true)
        .with_overlay(&local)
        .with_overlay(&extra);
    (dir, config)
}

#[test]
fn newest_across_trees() {
    let (dir, config) = setup();
    let resolver = TreeResolver::new(&config).unwrap();

    // Overlay version outranks the primary tree
    assert_eq!(
        resolver.newest_ebuild_path("vim", true).unwrap(),
        dir.path().join("local/app-editors/vim/vim-9.1.0_p1.ebuild")
    );
    // Overlay holds an older version: primary wins
    assert_eq!(
        resolver.newest_ebuild_path("libxml2", true).unwrap(),
        dir.path().join("gentoo/dev-libs/libxml2/libxml2-2.12.6-r1.ebuild")
    );
    // Only in overlays: the last overlay that has it is used
    assert_eq!(
        resolver.newest_ebuild_path("libfoo", true).unwrap(),
        dir.path().join("extra/dev-libs/libfoo/libfoo-0.2_beta1.ebuild")
    );
    assert!(matches!(
        resolver.newest_ebuild_path("libfoo", false),
        Err(Error::PackageNotFound(_))
    ));
}

#[test]
fn virtual_is_not_searched() {
    let (_dir, config) = setup();
    let resolver = TreeResolver::new(&config).unwrap();

    assert!(!resolver.primary().categories().unwrap().contains("virtual"));
    assert!(matches!(
        resolver.resolve_exact("editor", true),
        Err(Error::PackageNotFound(_))
    ));
    // Spelled out in full it is still reachable
    assert!(resolver.resolve_exact("virtual/editor", false).is_ok());
}

#[test]
fn regex_lists_every_tree() {
    let (dir, config) = setup();
    let resolver = TreeResolver::new(&config).unwrap();

    let re = Regex::new("^dev-libs/lib").unwrap();
    let found = resolver.resolve_regex(&re, true).unwrap();
    assert_eq!(
        found,
        [
            PackageMatch::new(dir.path().join("gentoo"), "dev-libs/libxml2"),
            PackageMatch::new(dir.path().join("local"), "dev-libs/libfoo"),
            PackageMatch::new(dir.path().join("extra"), "dev-libs/libfoo"),
            PackageMatch::new(dir.path().join("extra"), "dev-libs/libxml2"),
        ]
    );
}

#[test]
fn merged_versions() {
    let (_dir, config) = setup();
    let resolver = TreeResolver::new(&config).unwrap();

    let versions = resolver.versions("libxml2", true).unwrap();
    let listed: Vec<_> = versions.iter().map(|r| r.to_string()).collect();
    assert_eq!(listed, ["2.10", "2.11.7", "2.12.6-r1"]);
    assert_eq!(versions.front().unwrap().to_string(), "2.10");
}

#[test]
fn validation_failure_is_reported() {
    let (dir, config) = setup();
    fs::write(
        dir.path().join("gentoo").join(CATEGORIES_FILE),
        "app-editors\nmedia-gfx\n",
    )
    .unwrap();
    let resolver = TreeResolver::new(&config).unwrap();

    match resolver.resolve_exact("vim", false) {
        Err(Error::Qa(msg)) => assert!(msg.contains("media-gfx"), "{}", msg),
        other => panic!("unexpected result: {:?}", other),
    }
}
