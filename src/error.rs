//! HTTP error type for axum request handlers.
//!
//! [`AppError`] wraps [`anyhow::Error`] and renders it as the `/api/health`
//! error payload with a 500 status, so handlers can return
//! `Result<T, AppError>` and propagate with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::report::HealthReport;

/// Wraps [`anyhow::Error`] so it can be returned from axum handlers.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = format!("{:#}", self.0);
        tracing::error!(error = %detail, "handler error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthReport::failure(&self.0)),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
