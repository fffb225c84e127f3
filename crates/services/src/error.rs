//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by a `ContentProvider`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("content provider returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    #[error("content provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while reading configuration from the environment or flags.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {key} value {raw:?}: {source}")]
    InvalidUrl {
        key: &'static str,
        raw: String,
        source: url::ParseError,
    },
    #[error("invalid {key} value {raw:?}: expected a whole number")]
    InvalidNumber { key: &'static str, raw: String },
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}
