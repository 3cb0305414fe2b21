//! Seek - search dispatch and result aggregation client.
//!
//! This library talks to a remote search backend over HTTP. It provides
//! debounced querying, client-side filtering of results by user facets,
//! stale-response discarding, and file downloads.

pub mod backend;
pub mod download;
pub mod search;
pub mod settings;

use thiserror::Error;

/// Seek error types covering all failure modes.
#[derive(Error, Debug)]
pub enum SeekError {
    /// Query text was empty or whitespace-only; no request was sent
    #[error("Empty query: nothing to search for")]
    EmptyQuery,

    /// Backend unreachable, non-2xx status, or malformed response
    #[error("Network error: {0}")]
    Network(String),

    /// Backend sent a source kind this client does not know
    #[error("Unknown source kind: {0}")]
    UnknownSourceKind(i64),

    /// Operation not valid for the given result (e.g. downloading a webpage)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Client configuration could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors (file operations while saving downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SeekError {
    fn from(e: reqwest::Error) -> Self {
        SeekError::Network(e.to_string())
    }
}

/// Result type alias using SeekError
pub type Result<T> = std::result::Result<T, SeekError>;
