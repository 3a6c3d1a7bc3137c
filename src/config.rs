use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use winnow::ascii::{multispace1, space0, space1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use crate::error::{Error, Result};
use crate::fs::{is_directory, list_entries};

/// Default primary tree location.
pub const DEFAULT_PORTDIR: &str = "/usr/portage";
/// Default location of the user's extra categories.
pub const DEFAULT_USER_CATEGORIES: &str = "/etc/portage/categories";
/// make.conf locations, in the order they are tried.
pub const MAKE_CONF_PATHS: [&str; 2] = ["/etc/portage/make.conf", "/etc/make.conf"];

/// Where the trees live and how strictly to read them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the primary tree (`PORTDIR`).
    pub portdir: PathBuf,
    /// Overlay roots (`PORTDIR_OVERLAY`), in search order.
    pub overlays: Vec<PathBuf>,
    /// Require every manifest category to exist on disk.
    pub validate_categories: bool,
    /// Optional file with extra user categories.
    pub user_categories: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            portdir: PathBuf::from(DEFAULT_PORTDIR),
            overlays: Vec::new(),
            validate_categories: false,
            user_categories: Some(PathBuf::from(DEFAULT_USER_CATEGORIES)),
        }
    }
}

impl Config {
    /// Configuration for a single tree, with no overlays or user categories.
    pub fn new(portdir: impl Into<PathBuf>) -> Self {
        Config {
            portdir: portdir.into(),
            overlays: Vec::new(),
            validate_categories: false,
            user_categories: None,
        }
    }

    /// Append an overlay root, searched after those already added.
    pub fn with_overlay(mut self, overlay: impl Into<PathBuf>) -> Self {
        self.overlays.push(overlay.into());
        self
    }

    /// Check the primary tree's categories exist on disk.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_categories = validate;
        self
    }

    /// Extra category file merged into every tree's list.
    pub fn with_user_categories(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_categories = Some(path.into());
        self
    }

    /// Defaults, then the system make.conf, then `PORTDIR` and
    /// `PORTDIR_OVERLAY` from the environment.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();
        if let Some(path) = MAKE_CONF_PATHS.iter().map(Path::new).find(|p| p.exists()) {
            config.apply_make_conf_path(path)?;
        }
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults overridden by the settings of one make.conf file.
    pub fn from_make_conf(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.apply_make_conf_path(path)?;
        Ok(config)
    }

    /// Apply a make.conf file, or every file of a make.conf directory in
    /// name order.
    fn apply_make_conf_path(&mut self, path: &Path) -> Result<()> {
        let files = if is_directory(path) {
            list_entries(path)?
                .into_iter()
                .filter(|p| p.is_file())
                .collect()
        } else {
            vec![path.to_path_buf()]
        };

        for file in files {
            let contents = fs::read_to_string(&file).map_err(|e| Error::file(&file, e))?;
            let vars = parse_make_conf(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", file.display(), e)))?;
            debug!("{}: {} assignments", file.display(), vars.len());
            self.apply_vars(&vars);
        }
        Ok(())
    }

    /// Apply `PORTDIR` / `PORTDIR_OVERLAY` assignments.
    pub fn apply_vars(&mut self, vars: &HashMap<String, String>) {
        if let Some(portdir) = vars.get("PORTDIR").filter(|v| !v.trim().is_empty()) {
            self.portdir = PathBuf::from(portdir.trim());
        }
        if let Some(overlays) = vars.get("PORTDIR_OVERLAY") {
            self.overlays = split_overlays(overlays);
        }
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars: HashMap<String, String> = ["PORTDIR", "PORTDIR_OVERLAY"]
            .into_iter()
            .filter_map(|key| lookup(key).map(|value| (key.to_string(), value)))
            .collect();
        self.apply_vars(&vars);
    }
}

fn split_overlays(value: &str) -> Vec<PathBuf> {
    value
        .split_whitespace()
        .filter(|token| {
            if token.starts_with('$') {
                warn!("ignoring unexpanded overlay entry {}", token);
                false
            } else {
                true
            }
        })
        .map(PathBuf::from)
        .collect()
}

/// Parse the `KEY=value` assignments of a make.conf.
///
/// Values may be bare, single quoted or double quoted (quoted values may
/// span lines). A later assignment replaces an earlier one. Lines that are
/// not assignments are ignored.
pub fn parse_make_conf(input: &str) -> Result<HashMap<String, String>> {
    make_conf()
        .parse(input)
        .map_err(|e| Error::Config(e.to_string()))
}

// Winnow parsers

fn comment<'s>() -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    preceded('#', take_till(0.., '\n'))
}

fn key<'s>() -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .context(StrContext::Label("key"))
}

fn value<'s>() -> impl Parser<&'s str, &'s str, ErrMode<ContextError>> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_till(0.., [' ', '\t', '\r', '\n', '#']),
    ))
    .context(StrContext::Label("value"))
}

fn assignment<'s>() -> impl Parser<&'s str, (&'s str, &'s str), ErrMode<ContextError>> {
    (
        opt(("export", space1)),
        terminated(key(), '='),
        value(),
        space0,
        opt(comment()),
    )
        .map(|(_, k, v, _, _)| (k, v))
}

fn make_conf<'s>() -> impl Parser<&'s str, HashMap<String, String>, ErrMode<ContextError>> {
    repeat(
        0..,
        alt((
            multispace1.value(None),
            comment().value(None),
            assignment().map(Some),
            take_till(1.., '\n').value(None),
        )),
    )
    .map(|entries: Vec<Option<(&str, &str)>>| {
        entries
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    })
}
