//! Error types for resloc.
//!
//! "Not found" is never an error: resolution returns `Option`. The types
//! here cover the cases a caller can act on.

use std::path::PathBuf;

use thiserror::Error;

use crate::locator::Locator;

/// Resolution errors surfaced by the explicit `try_`/`parse_` entry points.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Text is not a well-formed absolute URL
    #[error("malformed URL `{text}`: {source}")]
    MalformedUrl {
        text: String,
        #[source]
        source: url::ParseError,
    },

    /// Home-relative lookup requested but no home directory is configured
    #[error("no home directory configured")]
    HomeUnset,
}

/// Failures while reading resource text.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The resource stream could not be opened
    #[error("cannot open `{locator}`")]
    Open {
        locator: Locator,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed after the stream was opened
    #[error("error reading text from `{locator}`")]
    Read {
        locator: Locator,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    pub fn locator(&self) -> &Locator {
        match self {
            Self::Open { locator, .. } | Self::Read { locator, .. } => locator,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error in `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("config file `{0}` not found")]
    NotFound(PathBuf),
}

/// resloc error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for resloc operations.
pub type Result<T> = std::result::Result<T, Error>;
