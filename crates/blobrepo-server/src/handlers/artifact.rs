//! Artifact fetch and publish handlers

use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use blobrepo_core::{
    validate_checksum, AuthGate, CoreError, MetadataGenerator, Operation, RequestContext,
};
use blobrepo_store::BlobStore;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, error, info};

/// GET /{*path} - Fetch an artifact, synthesizing default metadata if needed
pub async fn fetch_artifact(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let ctx = request_context(&state, &uri)?;
    authorize(&ctx, Operation::Read, &headers)?;

    if let Some(document) = MetadataGenerator::generate_if_absent(state.store.as_ref(), &ctx).await? {
        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/xml".to_string()),
                (header::CACHE_CONTROL, state.cache_control()),
            ],
            document,
        )
            .into_response());
    }

    let path = ctx.storage_path();
    let data = state.store.get(&path).await.map_err(|e| {
        if !e.is_not_found() {
            error!(error = %e, path = %path, "Failed to read artifact");
        }
        e
    })?;

    debug!(repo = %ctx.repository().id(), path = %path, bytes = data.len(), "Serving artifact");

    let content_type = mime_guess::from_path(ctx.filename())
        .first_or_octet_stream()
        .to_string();

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, state.cache_control()),
        ],
        data,
    )
        .into_response())
}

/// PUT /{*path} - Publish an artifact
pub async fn publish_artifact(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let ctx = request_context(&state, &uri)?;
    authorize(&ctx, Operation::Write, &headers)?;
    validate_checksum(ctx.filename(), &body)?;

    let path = ctx.storage_path();
    let size = body.len();
    state.store.put(&path, body).await.map_err(|e| {
        error!(error = %e, path = %path, "Unable to write artifact");
        e
    })?;

    info!(
        repo = %ctx.repository().id(),
        coordinate = %ctx.coordinate(),
        file = %ctx.filename(),
        bytes = size,
        "Finished writing artifact"
    );

    Ok((StatusCode::OK, "OK").into_response())
}

/// Percent-decode the request path and build the request context
fn request_context(state: &AppState, uri: &Uri) -> Result<RequestContext, ApiError> {
    let path = urlencoding::decode(uri.path())
        .map_err(|_| CoreError::MalformedPath(uri.path().to_string()))?;
    Ok(RequestContext::resolve(&state.resolver, &path)?)
}

/// Run the auth gate for `operation`, naming the repository in the challenge
fn authorize(ctx: &RequestContext, operation: Operation, headers: &HeaderMap) -> Result<(), ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    AuthGate::authorize(ctx.repository(), operation, header).map_err(|e| {
        debug!(repo = %ctx.repository().id(), reason = %e, "Authentication failed");
        ApiError::Unauthorized {
            realm: ctx.repository().id().to_string(),
        }
    })
}
