//! Login page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Template for the login page.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    title: &'static str,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login`
pub async fn login_handler() -> impl IntoResponse {
    LoginTemplate { title: "Sign in" }
}
