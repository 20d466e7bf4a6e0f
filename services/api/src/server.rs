use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScreeningStore};
use crate::routes::service_routes;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tamizaje::config::AppConfig;
use tamizaje::error::AppError;
use tamizaje::workflows::screening::{
    screening_router, CorsPolicy, PostgrestStore, ScreeningService, ScreeningStore,
};
use tamizaje::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    if args.in_memory {
        info!("submissions kept in process memory");
        let store = Arc::new(InMemoryScreeningStore::default());
        return serve(config, ScreeningService::new(store)).await;
    }

    match config.store.clone().map(PostgrestStore::new).transpose()? {
        Some(store) => serve(config, ScreeningService::new(Arc::new(store))).await,
        None => {
            warn!("store credentials missing; submissions will be rejected");
            serve(config, ScreeningService::<PostgrestStore>::unconfigured()).await
        }
    }
}

async fn serve<S>(config: AppConfig, service: ScreeningService<S>) -> Result<(), AppError>
where
    S: ScreeningStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let cors = CorsPolicy::new(config.server.allowed_origins.clone());
    let app = build_app(Arc::new(service), cors)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app<S>(service: Arc<ScreeningService<S>>, cors: CorsPolicy) -> Router
where
    S: ScreeningStore + 'static,
{
    screening_router(service, cors).merge(service_routes())
}
