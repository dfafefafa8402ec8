//! Error types for the blobrepo-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the request pipeline.
///
/// Each stage either hands its output to the next stage or returns one of
/// these; nothing downstream of a failure runs.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No configured repository prefix matches the request path
    #[error("unknown repository for path: {0}")]
    UnknownRepository(String),

    /// Too few segments after the repository prefix
    #[error("invalid path: {0}")]
    MalformedPath(String),

    /// Missing, malformed or mismatched credential
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Checksum sidecar payload has the wrong length
    #[error("invalid checksum for {filename}: expected {expected} bytes, got {actual}")]
    InvalidChecksum {
        filename: String,
        expected: usize,
        actual: usize,
    },

    /// Two repositories normalize to the same prefix
    #[error("duplicate repository prefix {prefix}: {first} and {second}")]
    DuplicatePrefix {
        prefix: String,
        first: String,
        second: String,
    },

    /// Blob store error
    #[error("store error: {0}")]
    Store(#[from] blobrepo_store::StoreError),
}
