//! HTTP API surface
//!
//! Two read-only resource endpoints behind the route gate:
//! `GET {namespace}/pages/{slug}` and `GET {namespace}/posts/{category}`.

pub mod error;
pub mod fields;
pub mod pages;
pub mod posts;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::content::ContentRepository;
use crate::gate::{self, RouteGate};

pub use error::ApiError;

/// Fixed body of every 404 the resolvers produce
pub const NOT_FOUND_BODY: &str = "Sin datos";

/// Shared state for handlers and gate middleware
pub struct AppState {
    pub config: ApiConfig,
    pub gate: RouteGate,
    pub repo: Arc<dyn ContentRepository>,
}

/// Build the router with both gates layered on every request
pub fn router(state: Arc<AppState>) -> Router {
    let resources = Router::new()
        .route("/pages/:slug", get(pages::page_by_slug))
        .route("/posts/:category", get(posts::posts_by_category));

    Router::new()
        .nest(&state.config.namespace, resources)
        .fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::route_gate,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), gate::auth_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Admitted paths with no registered route
async fn fallback_handler() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

/// A JSON response carrying the cache directive and the marker header
pub fn json_response(config: &ApiConfig, value: serde_json::Value) -> Response {
    (
        [
            (header::CACHE_CONTROL, config.cache_control()),
            (header::HeaderName::from_static("x-powered-by"), config.powered_by.clone()),
        ],
        Json(value),
    )
        .into_response()
}

/// The uniform 404 for absent or invalid input, same headers as a hit
pub fn not_found(config: &ApiConfig) -> Response {
    (
        StatusCode::NOT_FOUND,
        [
            (header::CACHE_CONTROL, config.cache_control()),
            (header::HeaderName::from_static("x-powered-by"), config.powered_by.clone()),
        ],
        NOT_FOUND_BODY,
    )
        .into_response()
}

/// Render a resolver error, keeping the wire contract
pub fn render_error(config: &ApiConfig, err: ApiError) -> Response {
    match err {
        ApiError::NotFound => not_found(config),
        ApiError::Upstream(e) => {
            tracing::error!("Upstream fault: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
