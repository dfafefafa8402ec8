//! Error types for the blobrepo-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during blob storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Blob not found
    #[error("blob not found: {0}")]
    NotFound(String),

    /// Path escapes the store root or contains unsafe components
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this error means the blob is simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
