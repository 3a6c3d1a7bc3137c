use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::EBUILD_EXT;
use crate::version::Revision;

/// Named fields of an ebuild file name
///
/// For `foo-bar-1.2_rc1-r3.ebuild`:
///
/// | field | value |
/// |---|---|
/// | `PN`  | `foo-bar` |
/// | `PV`  | `1.2_rc1` |
/// | `PR`  | `r3` |
/// | `P`   | `foo-bar-1.2_rc1` |
/// | `PVR` | `1.2_rc1-r3` |
/// | `PF`  | `foo-bar-1.2_rc1-r3` |
///
/// `PR` is always kept in canonical `rN` form and defaults to `r0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionComponents {
    pn: String,
    pv: String,
    revision: Revision,
}

impl VersionComponents {
    /// Split an ebuild file name (or a path to one) into its fields.
    ///
    /// Package names may themselves contain hyphens: everything in front of
    /// the version token is joined back into `PN`.
    pub fn parse(filename: &str) -> Result<Self> {
        let base = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filename);
        let stem = base.strip_suffix(EBUILD_EXT).unwrap_or(base);

        let mut parts: Vec<&str> = stem.split('-').collect();

        let revision = match parts.last().and_then(|last| Revision::from_token(last)) {
            Some(rev) if parts.len() > 1 => {
                parts.pop();
                rev
            }
            _ => Revision::default(),
        };

        if parts.len() < 2 {
            return Err(Error::MalformedVersion(format!(
                "{}: expected <name>-<version>",
                filename
            )));
        }

        let pv = parts.pop().unwrap_or_default().to_string();
        let pn = parts.join("-");

        if pn.is_empty() || pv.is_empty() {
            return Err(Error::MalformedVersion(format!(
                "{}: empty name or version",
                filename
            )));
        }

        Ok(VersionComponents { pn, pv, revision })
    }

    /// Package name.
    pub fn pn(&self) -> &str {
        &self.pn
    }

    /// Package version, suffix included.
    pub fn pv(&self) -> &str {
        &self.pv
    }

    /// Package revision in `rN` form.
    pub fn pr(&self) -> String {
        self.revision.token()
    }

    /// `PN-PV`
    pub fn p(&self) -> String {
        format!("{}-{}", self.pn, self.pv)
    }

    /// `PV-PR`
    pub fn pvr(&self) -> String {
        format!("{}-{}", self.pv, self.pr())
    }

    /// `PN-PV-PR`
    pub fn pf(&self) -> String {
        format!("{}-{}-{}", self.pn, self.pv, self.pr())
    }

    /// Parsed revision, `Revision(0)` when the file name carries none.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Look a field up by its variable name (`PN`, `PV`, `PR`, `P`, `PVR`, `PF`).
    pub fn get(&self, field: &str) -> Option<String> {
        match field {
            "PN" => Some(self.pn.clone()),
            "PV" => Some(self.pv.clone()),
            "PR" => Some(self.pr()),
            "P" => Some(self.p()),
            "PVR" => Some(self.pvr()),
            "PF" => Some(self.pf()),
            _ => None,
        }
    }
}

/// Displays the version with a zero revision hidden, e.g. `1.2` or `1.2-r1`.
impl fmt::Display for VersionComponents {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.pv, self.revision)
    }
}
