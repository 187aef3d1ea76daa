use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use critique_grader::grading::{grading_router, GradingService, ScoreCache};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_grading_routes<C>(service: Arc<GradingService<C>>) -> axum::Router
where
    C: ScoreCache + 'static,
{
    grading_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryScoreCache;
    use critique_grader::grading::ScoringEngine;
    use tower::ServiceExt;

    fn router() -> (axum::Router, Arc<InMemoryScoreCache>) {
        let cache = Arc::new(InMemoryScoreCache::default());
        let service = Arc::new(GradingService::new(ScoringEngine::default(), cache.clone()));
        (with_grading_routes(service), cache)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn repeated_score_requests_hit_the_cache() {
        let (router, cache) = router();
        let payload = json!({
            "annotations": [{
                "id": "a-1",
                "type": "gap",
                "locationStart": 0,
                "locationEnd": 25,
                "note": "The article never mentions retraining outcomes",
                "evidence": [{ "id": "e-1", "type": "quote", "content": "OECD 2023" }]
            }],
            "rubricItems": [],
            "textLength": 100
        });

        let mut cached_flags = Vec::new();
        for _ in 0..2 {
            let request = axum::http::Request::post("/api/v1/grading/score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(payload.to_string()))
                .expect("request builds");
            let response = router.clone().oneshot(request).await.expect("responds");
            assert_eq!(response.status(), StatusCode::OK);
            let body = json_body(response).await;
            assert_eq!(body["result"]["tier3Bonus"], json!(5.0));
            cached_flags.push(body["cached"].clone());
        }

        assert_eq!(cached_flags, vec![json!(false), json!(true)]);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_before_scoring() {
        let (router, cache) = router();
        let request = axum::http::Request::post("/api/v1/grading/score")
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(r#"{ "annotations": "nope" }"#))
            .expect("request builds");

        let response = router.oneshot(request).await.expect("responds");

        assert!(response.status().is_client_error());
        assert_eq!(cache.len(), 0);
    }
}
