use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoreCache};
use crate::routes::with_grading_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use critique_grader::config::AppConfig;
use critique_grader::error::AppError;
use critique_grader::grading::{GradingService, ScoringEngine};
use critique_grader::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let cache = Arc::new(InMemoryScoreCache::default());
    let grading_service = Arc::new(GradingService::new(
        ScoringEngine::new(config.scoring.clone()),
        cache,
    ));

    let app = with_grading_routes(grading_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "critique grading service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
