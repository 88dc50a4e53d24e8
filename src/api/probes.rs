//! `GET /api/health`: probe every monitored service and report the results.
//!
//! This is a thin layer over [`crate::probe::Prober::probe_all`]. Individual
//! unreachable services are part of a successful response; only a failure of
//! the probe cycle itself turns into a 500 via [`AppError`].

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    error::AppError, probe::ServiceProbeResult, report::HealthReport, state::AppState,
};

/// Run one probe cycle.
///
/// Example response:
/// ```json
/// {
///   "status": "success",
///   "results": [
///     { "name": "Backend API", "url": "https://api.example.com", "responseTime": 87, "status": "Operational" },
///     { "name": "Postgres Database", "url": "https://db.example.com", "responseTime": -1, "status": "Offline" }
///   ]
/// }
/// ```
pub async fn check_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthReport>, AppError> {
    into_report(state.prober.probe_all().await)
}

/// Turn the outcome of a probe cycle into the handler's response.
fn into_report(
    cycle: anyhow::Result<Vec<ServiceProbeResult>>,
) -> Result<Json<HealthReport>, AppError> {
    let results = cycle?;
    Ok(Json(HealthReport::Success { results }))
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Json, Router,
    };
    use tower::ServiceExt; // oneshot
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::test_support::{body_json, state_with};
    use crate::error::AppError;
    use crate::probe::{classify, ServiceEndpoint};
    use crate::report::{HealthReport, PROBE_FAILURE_MESSAGE};

    fn get_health() -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn reports_reachable_and_unreachable_services_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let app = crate::api::router(state_with(vec![
            ServiceEndpoint::new("A", server.uri()),
            ServiceEndpoint::new("B", "http://127.0.0.1:1"),
        ]));

        let resp = app.oneshot(get_health()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "success");
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);

        let a = &results[0];
        assert_eq!(a["name"], "A");
        assert_eq!(a["url"], server.uri());
        let a_ms = a["responseTime"].as_i64().unwrap();
        assert!(a_ms >= 0);
        assert_eq!(a["status"], classify(a_ms).to_string());

        let b = &results[1];
        assert_eq!(b["name"], "B");
        assert_eq!(b["responseTime"], -1);
        assert_eq!(b["status"], "Offline");
    }

    #[tokio::test]
    async fn all_services_down_is_still_a_success_response() {
        let app = crate::api::router(state_with(vec![
            ServiceEndpoint::new("x", "http://127.0.0.1:1"),
            ServiceEndpoint::new("y", "http://127.0.0.1:1/y"),
        ]));

        let resp = app.oneshot(get_health()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "success");
        assert!(json["results"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["status"] == "Offline" && r["responseTime"] == -1));
    }

    #[tokio::test]
    async fn rejects_non_get_methods() {
        let app = crate::api::router(state_with(Vec::new()));
        let req = Request::builder()
            .method("POST")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn failed_join_is_reported_as_500_error_payload() {
        async fn panicking_cycle() -> Result<Json<HealthReport>, AppError> {
            let joined = tokio::spawn(async { panic!("task blew up") }).await;
            super::into_report(
                joined
                    .map(|()| Vec::new())
                    .context("probe task did not complete"),
            )
        }
        let app = Router::new().route("/api/health", get(panicking_cycle));

        let resp = app.oneshot(get_health()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp.into_body()).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], PROBE_FAILURE_MESSAGE);
        let detail = json["error"].as_str().unwrap();
        assert!(detail.contains("probe task did not complete"), "{detail}");
        assert!(detail.contains("panic"), "{detail}");
    }
}
