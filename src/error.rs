//! Error types for payment target construction and parsing.

use std::path::PathBuf;

/// Errors produced when building or parsing a payment target.
///
/// Construction from parts fails only with [`PaytoError::InvalidAmount`].
/// The remaining variants are reported by the URI parser and by
/// [`crate::config`] when a declared target does not match the requested type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaytoError {
    /// The amount string could not be parsed as a decimal number.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),
    /// The input is not a syntactically valid URI.
    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),
    /// The URI scheme is something other than `payto`.
    #[error("Unsupported scheme {0:?}, expected \"payto\"")]
    UnsupportedScheme(String),
    /// The URI (or config entry) names a different payment target type.
    #[error("Authority mismatch: expected {expected:?}, got {actual:?}")]
    AuthorityMismatch {
        /// Authority of the requested target type.
        expected: &'static str,
        /// Authority found in the input.
        actual: String,
    },
    /// The URI carries no path identifier.
    #[error("Missing path identifier")]
    MissingPath,
    /// The path identifier does not percent-decode to UTF-8.
    #[error("Invalid path identifier {0:?}")]
    InvalidPath(String),
    /// A mandatory option is absent from the query.
    #[error("Missing mandatory option {0:?}")]
    MissingOption(&'static str),
    /// The `amount` option occurs more than once.
    #[error("The amount option must not occur more than once")]
    DuplicateAmount,
}

/// Errors produced while loading payment targets from a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file content is not a valid targets document.
    #[error("Failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
