use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::cache::ScoreCache;
use super::service::{
    ClassScoreRequest, GradingService, GradingServiceError, MatchRequest, ScoreRequest,
};

/// Router builder exposing HTTP endpoints for matching and scoring.
pub fn grading_router<C>(service: Arc<GradingService<C>>) -> Router
where
    C: ScoreCache + 'static,
{
    Router::new()
        .route("/api/v1/grading/match", post(match_handler::<C>))
        .route("/api/v1/grading/score", post(score_handler::<C>))
        .route("/api/v1/grading/score/batch", post(batch_handler::<C>))
        .with_state(service)
}

fn error_response(error: GradingServiceError) -> Response {
    let status = match error {
        GradingServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GradingServiceError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn match_handler<C>(
    State(service): State<Arc<GradingService<C>>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response
where
    C: ScoreCache + 'static,
{
    match service.match_text(&request) {
        Ok(matches) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<C>(
    State(service): State<Arc<GradingService<C>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    C: ScoreCache + 'static,
{
    match service.score_text(&request) {
        Ok(scored) => (StatusCode::OK, axum::Json(scored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler<C>(
    State(service): State<Arc<GradingService<C>>>,
    axum::Json(request): axum::Json<ClassScoreRequest>,
) -> Response
where
    C: ScoreCache + 'static,
{
    // Class scoring fans out on the rayon pool; keep it off the async workers.
    let scored = tokio::task::spawn_blocking(move || service.score_class(&request)).await;
    match scored {
        Ok(scores) => (StatusCode::OK, axum::Json(scores)).into_response(),
        Err(join_error) => {
            tracing::error!(%join_error, "class scoring task failed");
            let payload = json!({ "error": "class scoring failed" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
