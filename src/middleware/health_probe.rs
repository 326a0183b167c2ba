//! Liveness probe filter.
//!
//! Load balancers poll `/hacheck` (and anything below it). Those requests are
//! answered here with `200 "1"` and never reach the router.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

const PROBE_PREFIX: &str = "/hacheck";

pub async fn layer(req: Request, next: Next) -> Response {
    if req.uri().path().starts_with(PROBE_PREFIX) {
        return (StatusCode::OK, "1").into_response();
    }

    next.run(req).await
}
