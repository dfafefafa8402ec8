//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let artifacts = get(handlers::fetch_artifact).put(handlers::publish_artifact);

    let root = if state.config.display_info {
        get(handlers::landing_page)
    } else {
        artifacts.clone()
    };

    Router::new()
        .route("/", root)
        .route("/{*path}", artifacts)
        // Apply middleware
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::ip_whitelist_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}
