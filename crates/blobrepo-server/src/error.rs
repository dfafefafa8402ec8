//! API error type and its JSON rendering

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use blobrepo_core::CoreError;
use blobrepo_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Credential check failed for the named repository
    #[error("Unauthorized for repository {realm}")]
    Unauthorized { realm: String },

    /// Peer address is not on the allow-list
    #[error("Forbidden")]
    Forbidden,
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Core(e) => match e {
                CoreError::UnknownRepository(_) => StatusCode::BAD_REQUEST,
                CoreError::MalformedPath(_) => StatusCode::NOT_FOUND,
                CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CoreError::InvalidChecksum { .. } => StatusCode::BAD_REQUEST,
                CoreError::DuplicatePrefix { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                CoreError::Store(e) => store_status(e),
            },
            Self::Store(e) => store_status(e),
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// Message returned to the client.
    ///
    /// Malformed paths read exactly like missing files, and server-side
    /// failures never expose their cause.
    pub fn public_message(&self) -> String {
        match self {
            Self::Core(CoreError::UnknownRepository(path)) => {
                format!("Unknown repo for path: {}", path)
            }
            Self::Core(CoreError::MalformedPath(_)) => "File not found".to_string(),
            Self::Core(CoreError::Unauthorized(_)) | Self::Unauthorized { .. } => {
                "Unauthorized".to_string()
            }
            Self::Core(CoreError::InvalidChecksum { .. }) => "Invalid checksums!".to_string(),
            Self::Core(CoreError::Store(e)) | Self::Store(e) => store_message(e),
            Self::Forbidden => "Forbidden".to_string(),
            Self::Core(CoreError::DuplicatePrefix { .. }) => "Internal server error".to_string(),
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn store_message(err: &StoreError) -> String {
    match err {
        StoreError::NotFound(_) => "File not found".to_string(),
        StoreError::InvalidPath(_) => "Invalid path".to_string(),
        StoreError::Io(_) => "Internal server error".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        let body = Json(json!({ "error": self.public_message() }));
        match self {
            Self::Unauthorized { realm } => (
                status,
                [(header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", realm))],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}
