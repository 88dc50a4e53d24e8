//! Liveness probe for the dashboard process itself.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /healthz`: always 200 with `{"status": "ok", "uptime_secs": N}`.
///
/// Never touches the monitored services, so it is safe as a container
/// liveness check.
pub async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "uptime_secs": state.started_at.elapsed().as_secs(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::api::test_support::{body_json, state_with};
    use crate::probe::ServiceEndpoint;

    #[tokio::test]
    async fn healthz_returns_200_ok_without_probing() {
        // Unreachable endpoint: /healthz must not depend on it.
        let app = crate::api::router(state_with(vec![ServiceEndpoint::new(
            "never",
            "http://127.0.0.1:1",
        )]));
        let req = Request::builder()
            .method("GET")
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "ok");
        assert!(json["uptime_secs"].is_u64());
    }
}
