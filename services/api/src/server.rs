use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_placement_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement_advisor::config::{AppConfig, ModelConfig};
use placement_advisor::error::AppError;
use placement_advisor::placement::{ModelLoader, PlacementPipeline};
use placement_advisor::telemetry;
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
    if let Some(model) = args.model.take() {
        config.model = ModelConfig::new(model)?;
    }

    telemetry::init(&config.telemetry)?;

    // No degraded mode: an unusable artifact stops startup here.
    let model = ModelLoader::load(&config.model.artifact_path)?;
    let pipeline = PlacementPipeline::from_model(&model);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model: Arc::new(model.descriptor),
    };

    let app = with_placement_routes(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
