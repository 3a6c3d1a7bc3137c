use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use winnow::ascii::digit1;
use winnow::combinator::{alt, eof, opt, preceded, separated, terminated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::rest;

use crate::error::{Error, Result};

/// Ebuild revision (`-r1`, `-r2`, etc.)
///
/// A revision of `0` is implied when an ebuild carries none. It still takes
/// part in comparisons but is hidden from display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(pub u64);

impl Revision {
    /// Parse a bare revision token such as `r3`.
    ///
    /// Returns `None` unless the token is exactly `r` followed by digits.
    pub fn from_token(token: &str) -> Option<Self> {
        terminated(preceded('r', parse_number()), eof)
            .parse(token)
            .ok()
            .map(Revision)
    }

    /// Canonical `rN` form, always including `r0`.
    pub fn token(&self) -> String {
        format!("r{}", self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            Ok(())
        } else {
            write!(f, "-r{}", self.0)
        }
    }
}

/// Split a trailing `-rN` off a `PVR` string.
pub(crate) fn split_revision(pvr: &str) -> (&str, Option<Revision>) {
    match pvr.rsplit_once('-') {
        Some((pv, token)) => match Revision::from_token(token) {
            Some(rev) => (pv, Some(rev)),
            None => (pvr, None),
        },
        None => (pvr, None),
    }
}

/// Release stage named by a version suffix
///
/// Variants are declared in rank order. A version without any suffix ranks
/// below all of them, so `1.0 < 1.0_alpha < 1.0_rc < 1.0_p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuffixKind {
    /// `_alpha`
    Alpha,
    /// `_beta`
    Beta,
    /// `_pre`
    Pre,
    /// `_rc`
    Rc,
    /// `_p` (patchlevel)
    P,
}

impl fmt::Display for SuffixKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SuffixKind::Alpha => write!(f, "_alpha"),
            SuffixKind::Beta => write!(f, "_beta"),
            SuffixKind::Pre => write!(f, "_pre"),
            SuffixKind::Rc => write!(f, "_rc"),
            SuffixKind::P => write!(f, "_p"),
        }
    }
}

impl FromStr for SuffixKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(SuffixKind::Alpha),
            "beta" => Ok(SuffixKind::Beta),
            "pre" => Ok(SuffixKind::Pre),
            "rc" => Ok(SuffixKind::Rc),
            "p" => Ok(SuffixKind::P),
            _ => Err(Error::MalformedVersion(format!("invalid suffix kind: {}", s))),
        }
    }
}

/// Release suffix of a version (`_alpha3`, `_rc`, `_p20240101`, or nothing)
///
/// Unrecognized trailing words degrade to "no suffix" rather than failing,
/// so `Suffix::parse` never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Suffix {
    /// The suffix stage; `None` when the version has no recognized suffix.
    pub kind: Option<SuffixKind>,
    /// Optional numeric sub-version (e.g. `3` in `_alpha3`).
    pub version: Option<u64>,
}

impl Suffix {
    /// Extract the suffix from a `PVR` (or `PV`) string.
    pub fn parse(pvr: &str) -> Self {
        let (pv, _) = split_revision(pvr);
        let Some((_, tail)) = pv.rsplit_once('_') else {
            return Suffix::default();
        };
        parse_suffix_body().parse(tail).unwrap_or_default()
    }

    /// Whether the version carries a recognized suffix.
    pub fn is_none(&self) -> bool {
        self.kind.is_none()
    }

    /// Historical less-than predicate.
    ///
    /// Matches [`Ord`] except when both suffixes share a stage and neither has
    /// a sub-version: then it answers `true` in both directions. Not a strict
    /// weak ordering; use it only to reproduce historical sort output.
    pub fn precedes(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return self.kind < other.kind;
        }
        match (self.version, other.version) {
            (None, None) => true,
            (a, b) => a < b,
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(kind) = self.kind {
            write!(f, "{}", kind)?;
            if let Some(v) = self.version {
                write!(f, "{}", v)?;
            }
        }
        Ok(())
    }
}

impl PartialOrd for Suffix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suffix {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.kind.cmp(&other.kind) {
            // A missing sub-version sorts before any present one
            Ordering::Equal => self.version.cmp(&other.version),
            other => other,
        }
    }
}

/// One dotted group of a numeric version
///
/// Leading zeros are remembered so `01` and `1` stay distinguishable: at the
/// same value, the zero-padded group is the smaller one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    /// Numeric value, saturating at `u64::MAX`.
    pub value: u64,
    /// Number of leading zeros written before the value.
    pub zeros: usize,
}

impl Group {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            // "0", "00", ...: the last zero is the value itself
            return Group {
                value: 0,
                zeros: digits.len().saturating_sub(1),
            };
        }
        Group {
            value: trimmed.parse().unwrap_or(u64::MAX),
            zeros: digits.len() - trimmed.len(),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for _ in 0..self.zeros {
            write!(f, "0")?;
        }
        write!(f, "{}", self.value)
    }
}

impl PartialOrd for Group {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Group {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.value.cmp(&other.value) {
            // More padding sorts lower: "01" < "1"
            Ordering::Equal => other.zeros.cmp(&self.zeros),
            other => other,
        }
    }
}

/// Dotted numeric part of a version, with any suffix stripped
///
/// Compared group by group from the left. When every shared group is equal
/// the version with fewer groups is the smaller one, then the rarely present
/// non-numeric `extra` tail breaks the tie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NumericVersion {
    /// Dot-separated groups (e.g. `[1, 2, 3]` for `1.2.3`).
    pub groups: Vec<Group>,
    /// Whatever trails the last group, such as the `b` in `1.2b`.
    pub extra: Option<String>,
}

impl NumericVersion {
    /// Parse the numeric part of a `PV` string.
    pub fn parse(pv: &str) -> Self {
        let base = pv.split('_').next().unwrap_or(pv);
        parse_numeric().parse(base).unwrap_or_else(|_| NumericVersion {
            groups: Vec::new(),
            extra: Some(base.to_string()),
        })
    }
}

impl fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", group)?;
        }
        if let Some(extra) = &self.extra {
            write!(f, "{}", extra)?;
        }
        Ok(())
    }
}

impl PartialOrd for NumericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.groups.iter().zip(&other.groups) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        match self.groups.len().cmp(&other.groups.len()) {
            Ordering::Equal => self.extra.cmp(&other.extra),
            other => other,
        }
    }
}

// Winnow parsers

fn parse_number<'s>() -> impl Parser<&'s str, u64, ErrMode<ContextError>> {
    digit1.map(|s: &str| s.parse::<u64>().unwrap_or(u64::MAX))
}

fn parse_group<'s>() -> impl Parser<&'s str, Group, ErrMode<ContextError>> {
    digit1.map(Group::from_digits)
}

fn parse_suffix_kind<'s>() -> impl Parser<&'s str, SuffixKind, ErrMode<ContextError>> {
    alt((
        "alpha".value(SuffixKind::Alpha),
        "beta".value(SuffixKind::Beta),
        "pre".value(SuffixKind::Pre),
        "rc".value(SuffixKind::Rc),
        "p".value(SuffixKind::P),
    ))
}

/// Suffix text after the `_`, which must be consumed entirely.
fn parse_suffix_body<'s>() -> impl Parser<&'s str, Suffix, ErrMode<ContextError>> {
    terminated((parse_suffix_kind(), opt(parse_number())), eof)
        .map(|(kind, version)| Suffix {
            kind: Some(kind),
            version,
        })
        .context(StrContext::Label("suffix"))
}

fn parse_numeric<'s>() -> impl Parser<&'s str, NumericVersion, ErrMode<ContextError>> {
    (opt(separated(1.., parse_group(), '.')), rest)
        .map(|(groups, extra): (Option<Vec<Group>>, &str)| NumericVersion {
            groups: groups.unwrap_or_default(),
            extra: (!extra.is_empty()).then(|| extra.to_string()),
        })
        .context(StrContext::Label("numeric version"))
}
