//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /hacheck*`    - Liveness probe, answered by middleware
//! - `GET  /login`       - Login page
//! - `/*`                - Static files from `STATIC_DIR`, or a JSON 404
//!
//! # Middleware (outermost first)
//!
//! - **Compression** - Gzip response bodies
//! - **Access log** - Colorized request line, see [`request_log`]; sees the
//!   URI exactly as the client sent it
//! - **Path normalization** - Trailing slash handling
//! - **Health probe** - Short-circuits `/hacheck`
//! - **Panic catcher** - Turns handler panics into JSON `500` responses

use crate::error::{AppError, panic_response};
use crate::middleware::{health_probe, request_log};
use crate::state::AppState;
use crate::web;
use axum::http::Uri;
use axum::{Router, middleware};
use serde_json::json;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    let access_log = state.access_log.clone();
    let static_dir = state.config.static_dir.clone();

    let router = Router::new().merge(web::routes::public_routes());

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(not_found_handler),
    };

    let router = router
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(health_probe::layer));

    // Normalization has to run before routing, so the routed app is mounted
    // as the fallback of an outer router that carries the access log.
    let normalized = NormalizePathLayer::trim_trailing_slash().layer(router);

    Router::new()
        .fallback_service(normalized)
        .layer(middleware::from_fn_with_state(access_log, request_log::layer))
        .layer(CompressionLayer::new())
}

async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}
