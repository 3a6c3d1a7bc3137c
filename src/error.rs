use std::io;
use std::path::PathBuf;

/// Error type for version parsing and tree lookups
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed version: {0}")]
    MalformedVersion(String),

    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("ambiguous package '{name}': {}", .candidates.join(", "))]
    AmbiguousPackage {
        name: String,
        candidates: Vec<String>,
    },

    #[error("QA violation: {0}")]
    Qa(String),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }
}

/// Result type for portage-tree operations
pub type Result<T> = std::result::Result<T, Error>;
