//! `GET /` serves the status page.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

/// Serves a static page whose script calls `/api/health` once on load and
/// renders a spinner, the result table, or a single error line.
pub async fn status_page() -> impl IntoResponse {
    const HTML: &str = include_str!("status_page.html");
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], HTML)
}
