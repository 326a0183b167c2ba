//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::login_handler;
use axum::{Router, routing::get};

/// Public pages without authentication.
///
/// # Endpoints
///
/// - `GET /login` - Login page
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_handler))
}
